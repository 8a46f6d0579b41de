//! Layered settings for commit analysis.
//!
//! Values are resolved once at start-up, from lowest to highest precedence:
//!
//! 1. built-in defaults,
//! 2. the `[default]` table of the settings file,
//! 3. the table named after the active environment,
//! 4. `COMMIT_SENTINEL_<KEY>` environment variables,
//! 5. command-line flags.
//!
//! ```toml
//! [default]
//! branch = "main"
//! model_name = "llama3"
//! ollama_url = "http://localhost:11434/api/generate"
//!
//! [ci]
//! output = "reports"
//! ```

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Settings file read when none is given on the command line.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.toml";

/// Table holding values shared by every environment.
pub const BASE_ENVIRONMENT: &str = "default";

/// Environment used when none is selected.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Variable that selects the active environment.
pub const ENVIRONMENT_VAR: &str = "COMMIT_SENTINEL_ENV";

/// Prefix of per-key override variables.
pub const ENV_PREFIX: &str = "COMMIT_SENTINEL_";

const DEFAULT_BRANCH: &str = "HEAD";
const DEFAULT_GIT_REPO_DIR: &str = ".";
const DEFAULT_MODEL_NAME: &str = "llama3";
const DEFAULT_OUTPUT: &str = ".";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";

/// One layer of settings. Unset keys fall through to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsLayer {
    /// Branch or revision to analyse.
    #[serde(default)]
    pub branch: Option<String>,
    /// Repository directory.
    #[serde(default)]
    pub git_repo_dir: Option<String>,
    /// Model name sent to the inference endpoint.
    #[serde(default)]
    pub model_name: Option<String>,
    /// Output file (`*.txt`) or directory.
    #[serde(default)]
    pub output: Option<String>,
    /// Inference endpoint URL.
    #[serde(default)]
    pub ollama_url: Option<String>,
}

impl SettingsLayer {
    /// Reads `COMMIT_SENTINEL_<KEY>` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads `COMMIT_SENTINEL_<KEY>` variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(&format!("{ENV_PREFIX}{}", key.to_uppercase()));
        Self {
            branch: get("branch"),
            git_repo_dir: get("git_repo_dir"),
            model_name: get("model_name"),
            output: get("output"),
            ollama_url: get("ollama_url"),
        }
    }

    /// Returns this layer with every key set in `over` replaced.
    #[must_use]
    pub fn merge(self, over: Self) -> Self {
        Self {
            branch: over.branch.or(self.branch),
            git_repo_dir: over.git_repo_dir.or(self.git_repo_dir),
            model_name: over.model_name.or(self.model_name),
            output: over.output.or(self.output),
            ollama_url: over.ollama_url.or(self.ollama_url),
        }
    }
}

/// Contents of a settings file: one table per environment.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    /// Settings tables keyed by environment name.
    pub environments: HashMap<String, SettingsLayer>,
}

impl Settings {
    /// Loads settings from `path`. A missing file yields empty settings.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Parses settings from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Returns the `[default]` table overlaid with the `environment` table.
    ///
    /// Environment names match case-insensitively.
    pub fn layer_for(&self, environment: &str) -> SettingsLayer {
        let table = |name: &str| {
            self.environments
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, layer)| layer.clone())
                .unwrap_or_default()
        };

        let base = table(BASE_ENVIRONMENT);
        if environment.eq_ignore_ascii_case(BASE_ENVIRONMENT) {
            base
        } else {
            base.merge(table(environment))
        }
    }
}

/// Picks the active environment: the explicit choice, then
/// [`ENVIRONMENT_VAR`], then [`DEFAULT_ENVIRONMENT`].
pub fn active_environment(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| env::var(ENVIRONMENT_VAR).ok())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

/// Fully resolved configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Branch or revision whose tip is analysed.
    pub branch: String,
    /// Repository directory.
    pub git_repo_dir: PathBuf,
    /// Model name sent to the inference endpoint.
    pub model_name: String,
    /// Output file (`*.txt`) or directory.
    pub output: PathBuf,
    /// Inference endpoint URL.
    pub ollama_url: String,
}

impl AnalysisConfig {
    /// Collapses `layer` onto the built-in defaults and validates the result.
    pub fn from_layer(layer: SettingsLayer) -> Result<Self> {
        let ollama_url = layer
            .ollama_url
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        Url::parse(&ollama_url)
            .with_context(|| format!("Invalid inference endpoint URL: {ollama_url}"))?;

        Ok(Self {
            branch: layer.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            git_repo_dir: PathBuf::from(
                layer
                    .git_repo_dir
                    .unwrap_or_else(|| DEFAULT_GIT_REPO_DIR.to_string()),
            ),
            model_name: layer
                .model_name
                .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            output: PathBuf::from(layer.output.unwrap_or_else(|| DEFAULT_OUTPUT.to_string())),
            ollama_url,
        })
    }

    /// Resolves the configuration from the settings file at `settings_path`,
    /// the process environment and the command-line `overrides`.
    pub fn load(
        settings_path: &Path,
        environment: Option<&str>,
        overrides: SettingsLayer,
    ) -> Result<Self> {
        let settings = Settings::load_from_path(settings_path)?;
        let environment = active_environment(environment);

        debug!(
            settings = %settings_path.display(),
            environment = %environment,
            "Resolving configuration"
        );

        let layer = settings
            .layer_for(&environment)
            .merge(SettingsLayer::from_env())
            .merge(overrides);

        Self::from_layer(layer)
    }
}
