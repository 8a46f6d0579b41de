//! End-to-end analysis run: extract, assess, print, write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::git::CommitRecord;
use crate::llm::{assess_commit, prompts, InferenceClient, PromptBudget};
use crate::output::write_assessment;

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    /// Hash of the analysed commit.
    pub commit_id: String,
    /// Trimmed assessment text.
    pub assessment: String,
    /// File the assessment was written to.
    pub output_path: PathBuf,
}

fn extract(config: &AnalysisConfig) -> Result<CommitRecord> {
    CommitRecord::extract(&config.branch, &config.git_repo_dir).with_context(|| {
        format!(
            "Failed to read '{}' from {}",
            config.branch,
            config.git_repo_dir.display()
        )
    })
}

/// Runs one analysis with `client`.
///
/// The assessment is printed to stdout before the output file is written, so
/// it is visible even when the write fails.
pub async fn run(config: &AnalysisConfig, client: &dyn InferenceClient) -> Result<AnalysisOutcome> {
    let record = extract(config)?;
    info!(
        commit = record.short_id(),
        author = %record.author,
        files = record.files_changed.len(),
        "Analysing commit"
    );

    let answer = assess_commit(&record, client).await?;
    let assessment = answer.trim().to_string();

    println!("{assessment}");

    let output_path = write_assessment(&config.output, &assessment)?;
    info!(path = %output_path.display(), "Wrote assessment");

    Ok(AnalysisOutcome {
        commit_id: record.id,
        assessment,
        output_path,
    })
}

/// Prints the prompt that would be sent, followed by its budget estimate,
/// without contacting the inference endpoint.
pub fn preview(config: &AnalysisConfig) -> Result<()> {
    let record = extract(config)?;
    let prompt = prompts::build_prompt(&record);
    let check = PromptBudget::for_model(&config.model_name).check(&prompt);

    println!("{prompt}");
    println!(
        "# commit {} | model {} | ~{} of {} tokens{}",
        record.short_id(),
        config.model_name,
        check.estimated_tokens,
        check.max_tokens,
        if check.exceeded { " (over budget)" } else { "" }
    );

    Ok(())
}
