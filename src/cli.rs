//! CLI interface for commit-sentinel.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::analysis;
use crate::config::{AnalysisConfig, SettingsLayer, DEFAULT_SETTINGS_FILE};
use crate::llm::OllamaClient;

/// commit-sentinel: LLM risk assessment of the latest commit.
///
/// Flags override values from the settings file and `COMMIT_SENTINEL_*`
/// environment variables.
#[derive(Parser, Debug)]
#[command(name = "commit-sentinel")]
#[command(about = "Assess the risk of the latest commit with a local LLM", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Branch (or any revision) whose tip commit is analysed.
    #[arg(short = 'b', long)]
    pub branch: Option<String>,

    /// Repository directory.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub git_repo_dir: Option<String>,

    /// Model name sent to the inference endpoint.
    #[arg(short = 'm', long)]
    pub model_name: Option<String>,

    /// Output file ending in .txt, or a directory for llm_commit_analysis.txt.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<String>,

    /// Inference endpoint URL.
    #[arg(short = 'u', long, value_name = "URL")]
    pub ollama_url: Option<String>,

    /// Settings file.
    #[arg(short = 's', long, value_name = "FILE", default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Settings environment (defaults to $COMMIT_SENTINEL_ENV or "development").
    #[arg(short = 'e', long)]
    pub env: Option<String>,

    /// Prints the prompt and its size estimate instead of sending it.
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl Cli {
    /// Returns the flag values as the top configuration layer.
    pub fn overrides(&self) -> SettingsLayer {
        SettingsLayer {
            branch: self.branch.clone(),
            git_repo_dir: self.git_repo_dir.clone(),
            model_name: self.model_name.clone(),
            output: self.output.clone(),
            ollama_url: self.ollama_url.clone(),
        }
    }

    /// Resolves the full configuration for this invocation.
    pub fn load_config(&self) -> Result<AnalysisConfig> {
        AnalysisConfig::load(&self.settings, self.env.as_deref(), self.overrides())
    }

    /// Executes the analysis.
    pub async fn execute(self) -> Result<()> {
        let config = self.load_config()?;

        if self.dry_run {
            return analysis::preview(&config);
        }

        let client = OllamaClient::new(config.ollama_url.clone(), config.model_name.clone());
        info!(url = client.url(), model = %config.model_name, "Using inference endpoint");
        analysis::run(&config, &client).await?;
        Ok(())
    }
}
