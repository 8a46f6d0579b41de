//! Prompt size budgets per model.
//!
//! The token count is estimated as the prompt's character count divided by
//! four. The result is advisory: an oversized prompt is reported, never
//! truncated.

/// Approximate characters per token for the heuristic estimate.
const CHARS_PER_TOKEN: usize = 4;

/// Token allowance used for models missing from [`MODEL_BUDGETS`].
pub const DEFAULT_BUDGET: usize = 4000;

/// Known models and their approximate token allowance.
pub const MODEL_BUDGETS: &[(&str, usize)] = &[("llama3", 8000), ("mistral", 4000)];

/// Estimates the token count of `text`.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// Outcome of checking a prompt against a [`PromptBudget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetCheck {
    /// Estimated prompt tokens.
    pub estimated_tokens: usize,
    /// Allowance for the model.
    pub max_tokens: usize,
    /// Whether the estimate is above the allowance.
    pub exceeded: bool,
}

/// Token allowance for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBudget {
    model: String,
    max_tokens: usize,
}

impl PromptBudget {
    /// Looks up the budget for `model`, falling back to [`DEFAULT_BUDGET`].
    #[must_use]
    pub fn for_model(model: &str) -> Self {
        let max_tokens = MODEL_BUDGETS
            .iter()
            .find(|(name, _)| *name == model)
            .map_or(DEFAULT_BUDGET, |(_, budget)| *budget);

        Self {
            model: model.to_string(),
            max_tokens,
        }
    }

    /// Returns the model this budget applies to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the token allowance.
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Estimates the size of `prompt` and compares it with the allowance.
    #[must_use]
    pub fn check(&self, prompt: &str) -> BudgetCheck {
        let estimated_tokens = estimate_tokens(prompt);
        BudgetCheck {
            estimated_tokens,
            max_tokens: self.max_tokens,
            exceeded: estimated_tokens > self.max_tokens,
        }
    }
}
