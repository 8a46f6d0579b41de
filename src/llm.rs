//! Commit risk assessment through a locally hosted LLM.

pub mod budget;
pub mod client;
pub mod ollama;
pub mod prompts;
#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::Result;
use tracing::{debug, warn};

use crate::git::CommitRecord;

pub use budget::{BudgetCheck, PromptBudget};
pub use client::InferenceClient;
pub use ollama::{OllamaClient, NO_RESPONSE};

/// Renders the review prompt for `record`, checks it against the model's
/// budget and sends it through `client`.
///
/// An oversized prompt only produces a warning; it is sent unmodified.
pub async fn assess_commit(record: &CommitRecord, client: &dyn InferenceClient) -> Result<String> {
    let prompt = prompts::build_prompt(record);
    let budget = PromptBudget::for_model(client.model());
    let check = budget.check(&prompt);

    debug!(
        model = client.model(),
        prompt_len = prompt.len(),
        estimated_tokens = check.estimated_tokens,
        max_tokens = check.max_tokens,
        "Built review prompt"
    );

    if check.exceeded {
        warn!(
            model = budget.model(),
            estimated_tokens = check.estimated_tokens,
            max_tokens = check.max_tokens,
            "Prompt exceeds the model's budget; the model may not see all of the commit"
        );
    }

    client.generate(&prompt).await
}

/// Asks the Ollama endpoint at `ollama_url` to assess `record` with `model_name`.
pub async fn ask_question(record: &CommitRecord, ollama_url: &str, model_name: &str) -> Result<String> {
    let client = OllamaClient::new(ollama_url, model_name);
    assess_commit(record, &client).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::git::DiffStats;
    use crate::llm::test_utils::MockInferenceClient;

    fn record_with_diff(diff_text: String) -> CommitRecord {
        CommitRecord {
            id: "abc123".to_string(),
            author: "Alice".to_string(),
            message: "Initial commit".to_string(),
            timestamp: "2025-01-01 12:00:00".to_string(),
            diff_text,
            files_changed: vec!["a.txt".to_string()],
            stats: DiffStats {
                files: 1,
                insertions: 1,
                deletions: 0,
                lines: 1,
            },
        }
    }

    #[tokio::test]
    async fn assess_commit_sends_rendered_prompt() {
        let record = record_with_diff("+hello\n".to_string());
        let client = MockInferenceClient::new("llama3", vec![Ok("Risk Score: 2".to_string())]);
        let recorded = client.prompt_handle();

        let answer = assess_commit(&record, &client).await.unwrap();

        assert_eq!(answer, "Risk Score: 2");
        assert_eq!(recorded.prompts(), vec![prompts::build_prompt(&record)]);
    }

    #[tokio::test]
    async fn oversized_prompt_is_sent_unmodified() {
        // 40k characters of diff is far beyond mistral's 4000-token budget.
        let record = record_with_diff("+x".repeat(20_000));
        let expected = prompts::build_prompt(&record);
        assert!(PromptBudget::for_model("mistral").check(&expected).exceeded);

        let client = MockInferenceClient::new("mistral", vec![Ok("ok".to_string())]);
        let recorded = client.prompt_handle();

        assess_commit(&record, &client).await.unwrap();

        assert_eq!(recorded.request_count(), 1);
        assert_eq!(recorded.prompts()[0], expected);
    }

    #[tokio::test]
    async fn client_errors_propagate() {
        let record = record_with_diff(String::new());
        let client = MockInferenceClient::new(
            "llama3",
            vec![Err(crate::AnalysisError::Transport("connection refused".to_string()).into())],
        );

        let err = assess_commit(&record, &client).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::AnalysisError>(),
            Some(crate::AnalysisError::Transport(_))
        ));
    }
}
