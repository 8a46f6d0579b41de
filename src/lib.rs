//! # commit-sentinel
//!
//! Pre-merge risk assessment for the latest commit of a git repository.
//!
//! The tool reads the tip commit of a branch, renders it into a review
//! prompt, asks a locally hosted LLM (Ollama's `/api/generate` endpoint) for
//! a summary, risk factors, a 1-10 risk score and a review recommendation,
//! and writes the answer to a text file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use commit_sentinel::git::CommitRecord;
//! use commit_sentinel::llm::ask_question;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let record = CommitRecord::extract("HEAD", ".")?;
//! let answer = ask_question(&record, "http://localhost:11434/api/generate", "llama3").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod output;

pub use crate::cli::Cli;
pub use crate::error::AnalysisError;

/// The current version of commit-sentinel.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
