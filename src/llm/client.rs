//! Inference client trait.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;

/// A service that turns a prompt into a completion.
pub trait InferenceClient: Send + Sync {
    /// Sends `prompt` and returns the model's text answer.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

    /// Returns the model identifier requests are sent for.
    fn model(&self) -> &str;
}
