//! Shared test utilities for the `llm` module.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::llm::client::InferenceClient;

/// Mock inference client with a pre-programmed queue of responses.
///
/// Responses are returned in FIFO order. When the queue is exhausted,
/// subsequent calls return `Err("no more mock responses")`. Every prompt is
/// recorded so tests can inspect what was dispatched.
pub(crate) struct MockInferenceClient {
    model: String,
    responses: Arc<Mutex<VecDeque<Result<String>>>>,
    recorded_prompts: Arc<Mutex<Vec<String>>>,
}

impl MockInferenceClient {
    /// Creates a mock client for `model` that returns the given responses in order.
    pub(crate) fn new(model: &str, responses: Vec<Result<String>>) -> Self {
        Self {
            model: model.to_string(),
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            recorded_prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a handle for reading the prompts sent to this client.
    pub(crate) fn prompt_handle(&self) -> PromptRecordHandle {
        PromptRecordHandle {
            recorded_prompts: self.recorded_prompts.clone(),
        }
    }
}

/// Shared handle to a mock client's recorded prompts.
pub(crate) struct PromptRecordHandle {
    recorded_prompts: Arc<Mutex<Vec<String>>>,
}

impl PromptRecordHandle {
    /// Returns all recorded prompts.
    pub(crate) fn prompts(&self) -> Vec<String> {
        self.recorded_prompts.lock().unwrap().clone()
    }

    /// Returns the number of requests that were made.
    pub(crate) fn request_count(&self) -> usize {
        self.recorded_prompts.lock().unwrap().len()
    }
}

impl InferenceClient for MockInferenceClient {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        let responses = self.responses.clone();
        let recorded = self.recorded_prompts.clone();
        let prompt = prompt.to_string();
        Box::pin(async move {
            recorded.lock().unwrap().push(prompt);
            responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no more mock responses")))
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
