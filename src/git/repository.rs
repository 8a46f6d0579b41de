//! Read-only git repository access.

use std::path::Path;

use anyhow::Result;
use git2::{Commit, Repository};
use tracing::debug;

use crate::error::AnalysisError;

/// Git repository wrapper.
///
/// Only reads repository state; nothing here touches the index, the working
/// tree or any reference.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Opens the repository at the specified path.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|source| AnalysisError::RepositoryNotFound {
            path: path.display().to_string(),
            source,
        })?;

        debug!(git_dir = %repo.path().display(), "Opened git repository");

        Ok(Self { repo })
    }

    /// Returns access to the underlying `git2::Repository`.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Returns the checked-out branch name, or `None` on a detached or unborn HEAD.
    pub fn current_branch(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        head.shorthand()
            .filter(|name| *name != "HEAD")
            .map(str::to_string)
    }

    /// Resolves a branch name (or any revision such as `HEAD`, a tag or a
    /// hash) to the commit at its tip.
    pub fn resolve_commit(&self, branch: &str) -> Result<Commit<'_>> {
        let object = self.repo.revparse_single(branch).map_err(|e| {
            AnalysisError::RepositoryAccess(format!("Cannot resolve '{branch}': {}", e.message()))
        })?;

        let commit = object.peel_to_commit().map_err(|e| {
            AnalysisError::RepositoryAccess(format!(
                "'{branch}' does not point to a commit: {}",
                e.message()
            ))
        })?;

        if branch != "HEAD" {
            let current = self.current_branch();
            if current.as_deref() != Some(branch) {
                debug!(
                    requested = branch,
                    checked_out = ?current,
                    "Analysing a branch other than the checked-out one"
                );
            }
        }

        Ok(commit)
    }
}
