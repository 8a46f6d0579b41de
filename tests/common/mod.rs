#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

/// Fixed author time so records are reproducible.
pub const AUTHOR_EPOCH: i64 = 1_700_000_000;

/// Temporary git repository with helpers for scripted commits.
pub struct TestRepo {
    _temp_dir: TempDir,
    pub repo_path: PathBuf,
    pub repo: Repository,
    pub commits: Vec<Oid>,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let repo_path = temp_dir.path().join("repo");
        fs::create_dir_all(&repo_path)?;

        let repo = Repository::init(&repo_path)?;

        let mut config = repo.config()?;
        config.set_str("user.name", "Test User")?;
        config.set_str("user.email", "test@example.com")?;

        Ok(Self {
            _temp_dir: temp_dir,
            repo_path,
            repo,
            commits: Vec::new(),
        })
    }

    /// Directory next to the repository, for output files.
    pub fn scratch_dir(&self) -> PathBuf {
        self.repo_path.parent().unwrap().join("scratch")
    }

    /// Writes text `files` and commits them on HEAD as `author`.
    pub fn commit_files(&mut self, author: &str, message: &str, files: &[(&str, &str)]) -> Result<Oid> {
        for (path, content) in files {
            self.stage(path, content.as_bytes())?;
        }
        self.commit_index(author, message)
    }

    /// Writes raw bytes to `path` and commits it on HEAD as `author`.
    pub fn commit_bytes(&mut self, author: &str, message: &str, path: &str, content: &[u8]) -> Result<Oid> {
        self.stage(path, content)?;
        self.commit_index(author, message)
    }

    fn stage(&self, path: &str, content: &[u8]) -> Result<()> {
        let full_path = self.repo_path.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, content)?;

        let mut index = self.repo.index()?;
        index.add_path(Path::new(path))?;
        index.write()?;
        Ok(())
    }

    /// Removes `path` and commits the deletion on HEAD.
    pub fn delete_file(&mut self, author: &str, message: &str, path: &str) -> Result<Oid> {
        fs::remove_file(self.repo_path.join(path))?;
        let mut index = self.repo.index()?;
        index.remove_path(Path::new(path))?;
        index.write()?;
        self.commit_index(author, message)
    }

    fn commit_index(&mut self, author: &str, message: &str) -> Result<Oid> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let email = format!("{}@example.com", author.to_lowercase());
        let time = Time::new(AUTHOR_EPOCH + self.commits.len() as i64, 0);
        let signature = Signature::new(author, &email, &time)?;

        let parent = match self.commits.last() {
            Some(id) => Some(self.repo.find_commit(*id)?),
            None => None,
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let commit_id = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        self.commits.push(commit_id);
        Ok(commit_id)
    }

    /// Creates a local branch pointing at the commit with the given index.
    pub fn branch_at(&self, name: &str, index: usize) -> Result<()> {
        let commit = self.repo.find_commit(self.commits[index])?;
        self.repo.branch(name, &commit, false)?;
        Ok(())
    }
}
