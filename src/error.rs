//! Error types for commit extraction and assessment requests.

use thiserror::Error;

/// Fatal errors raised while analysing a commit.
///
/// A missing `response` field in the inference reply is not an error; it
/// degrades to [`NO_RESPONSE`](crate::llm::ollama::NO_RESPONSE).
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The repository directory does not hold a git repository.
    #[error("Git repository not found at {path}")]
    RepositoryNotFound {
        /// Directory that was opened.
        path: String,
        /// Underlying libgit2 error.
        #[source]
        source: git2::Error,
    },

    /// The repository opened but the commit to analyse could not be read.
    #[error("Repository access failed: {0}")]
    RepositoryAccess(String),

    /// The inference endpoint could not be reached.
    #[error("Network error: {0}")]
    Transport(String),

    /// The inference endpoint answered with a non-success status.
    #[error("Inference request failed: HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The inference endpoint answered with a body that is not JSON.
    #[error("Invalid response format from inference endpoint: {0}")]
    MalformedResponse(String),
}
