//! Ollama `/api/generate` client.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::client::InferenceClient;
use crate::error::AnalysisError;

/// Returned when the endpoint's reply carries no `response` text.
pub const NO_RESPONSE: &str = "[No response]";

/// Generate request body.
#[derive(Serialize, Debug)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Client for a local Ollama generate endpoint.
///
/// Sends one non-streaming request per prompt with the transport's default
/// timeouts and no retries.
pub struct OllamaClient {
    /// HTTP client for API requests
    client: Client,
    /// Full endpoint URL, e.g. `http://localhost:11434/api/generate`
    url: String,
    /// Model identifier
    model: String,
}

impl OllamaClient {
    /// Creates a client posting to `url` for `model`.
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            model: model.into(),
        }
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Pulls the `response` string out of a generate reply.
fn extract_response(body: &Value) -> String {
    body.get("response")
        .and_then(Value::as_str)
        .map_or_else(|| NO_RESPONSE.to_string(), str::to_string)
}

impl InferenceClient for OllamaClient {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let request = GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            };

            info!(url = %self.url, model = %self.model, "Sending request to inference endpoint");

            let response = self
                .client
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(|e| AnalysisError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AnalysisError::HttpStatus {
                    status: status.as_u16(),
                    body,
                }
                .into());
            }

            let body = response
                .text()
                .await
                .map_err(|e| AnalysisError::Transport(e.to_string()))?;

            let value: Value = serde_json::from_str(&body)
                .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

            let text = extract_response(&value);
            debug!(
                response_len = text.len(),
                has_response = text != NO_RESPONSE,
                "Received inference response"
            );

            Ok(text)
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
