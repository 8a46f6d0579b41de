//! Assessment output file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File name used when the output path is a directory.
pub const DEFAULT_OUTPUT_FILE: &str = "llm_commit_analysis.txt";

/// Resolves the configured output to a file path.
///
/// A path ending in `.txt` names the file itself; anything else is a
/// directory that receives [`DEFAULT_OUTPUT_FILE`].
pub fn resolve_output_path(output: &Path) -> PathBuf {
    if output.to_string_lossy().ends_with(".txt") {
        output.to_path_buf()
    } else {
        output.join(DEFAULT_OUTPUT_FILE)
    }
}

/// Writes `assessment` to the resolved output path, replacing any previous
/// contents, and returns that path.
pub fn write_assessment(output: &Path, assessment: &str) -> Result<PathBuf> {
    let path = resolve_output_path(output);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    fs::write(&path, assessment)
        .with_context(|| format!("Failed to write assessment: {}", path.display()))?;

    Ok(path)
}
