//! Git operations: opening the repository and extracting the commit to analyse.

pub mod commit;
pub mod repository;

pub use commit::{CommitRecord, DiffStats};
pub use repository::GitRepository;

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;
