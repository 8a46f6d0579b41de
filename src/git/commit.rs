//! Commit extraction.
//!
//! A [`CommitRecord`] is a flat snapshot of one commit: identity, author,
//! message, author time, the files it touched, aggregate line statistics and
//! the unified diff text. Everything diff-related comes from a single
//! `git2::Diff` against the first parent (or the empty tree for a root
//! commit), so the statistics always describe the diff text next to them.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use git2::{Commit, Diff, Patch, Repository};
use serde::Serialize;
use tracing::debug;

use crate::git::{GitRepository, SHORT_HASH_LEN};

/// Format of [`CommitRecord::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separator placed between the per-file diff bodies.
const DIFF_SEPARATOR: &str = "\n";

/// Aggregate change statistics for a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    /// Number of files changed.
    pub files: usize,
    /// Lines added across all files.
    pub insertions: usize,
    /// Lines removed across all files.
    pub deletions: usize,
    /// Insertions plus deletions.
    pub lines: usize,
}

/// Snapshot of the commit under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    /// Full SHA-1 hash of the commit.
    pub id: String,
    /// Author display name.
    pub author: String,
    /// Commit message as written, possibly multi-line.
    pub message: String,
    /// Author time in local time, formatted with [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    /// Per-file unified diffs joined by newlines.
    pub diff_text: String,
    /// Changed paths in the order the diff reports them.
    pub files_changed: Vec<String>,
    /// Aggregate statistics of the same diff.
    pub stats: DiffStats,
}

impl CommitRecord {
    /// Opens the repository at `git_repo_dir` and extracts the tip commit of `branch`.
    pub fn extract<P: AsRef<Path>>(branch: &str, git_repo_dir: P) -> Result<Self> {
        let repo = GitRepository::open_at(git_repo_dir)?;
        let commit = repo.resolve_commit(branch)?;
        Self::from_git_commit(repo.repository(), &commit)
    }

    /// Builds a record from an already resolved commit.
    pub fn from_git_commit(repo: &Repository, commit: &Commit) -> Result<Self> {
        let diff = diff_against_first_parent(repo, commit)?;

        let diff_stats = diff.stats().context("Failed to get diff stats")?;
        let stats = DiffStats {
            files: diff_stats.files_changed(),
            insertions: diff_stats.insertions(),
            deletions: diff_stats.deletions(),
            lines: diff_stats.insertions() + diff_stats.deletions(),
        };

        let files_changed = changed_paths(&diff);
        let diff_text = render_diff_text(&diff)?;

        let author = commit.author();
        let timestamp = format_timestamp(author.when().seconds())?;

        let record = Self {
            id: commit.id().to_string(),
            author: decode_lossy(author.name_bytes()),
            message: decode_lossy(commit.message_bytes()),
            timestamp,
            diff_text,
            files_changed,
            stats,
        };

        debug!(
            commit = record.short_id(),
            files = record.stats.files,
            insertions = record.stats.insertions,
            deletions = record.stats.deletions,
            diff_len = record.diff_text.len(),
            "Extracted commit"
        );

        Ok(record)
    }

    /// Returns the abbreviated commit hash.
    pub fn short_id(&self) -> &str {
        self.id.get(..SHORT_HASH_LEN).unwrap_or(&self.id)
    }
}

/// Decodes bytes as UTF-8, replacing invalid sequences with U+FFFD.
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Formats epoch seconds as local time.
pub fn format_timestamp(seconds: i64) -> Result<String> {
    let utc = DateTime::<Utc>::from_timestamp(seconds, 0).context("Invalid commit timestamp")?;
    Ok(utc.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string())
}

/// Diffs the commit against its first parent, or the empty tree for a root commit.
fn diff_against_first_parent<'r>(repo: &'r Repository, commit: &Commit) -> Result<Diff<'r>> {
    let commit_tree = commit.tree().context("Failed to get commit tree")?;

    let parent_tree = if commit.parent_count() > 0 {
        Some(
            commit
                .parent(0)
                .context("Failed to get parent commit")?
                .tree()
                .context("Failed to get parent tree")?,
        )
    } else {
        None
    };

    repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&commit_tree), None)
        .context("Failed to create diff")
}

fn changed_paths(diff: &Diff) -> Vec<String> {
    diff.deltas()
        .filter_map(|delta| {
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|path| path.to_string_lossy().into_owned())
        })
        .collect()
}

fn render_diff_text(diff: &Diff) -> Result<String> {
    let delta_count = diff.deltas().len();
    let mut bodies = Vec::with_capacity(delta_count);

    for idx in 0..delta_count {
        // No patch is produced for unmodified or unreadable entries.
        let Some(mut patch) = Patch::from_diff(diff, idx).context("Failed to build patch")? else {
            continue;
        };
        let buf = patch.to_buf().context("Failed to render patch")?;
        bodies.push(decode_lossy(&buf));
    }

    Ok(bodies.join(DIFF_SEPARATOR))
}
