//! Mock LLM client for testing.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::discovery::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage};

/// Mock implementation of the LlmClient trait.
///
/// Returns a configured completion text, or a one-shot injected error.
/// Requests are recorded for assertions.
pub struct MockLlmClient {
    response: Mutex<String>,
    next_error: Mutex<Option<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            response: Mutex::new("[]".to_string()),
            next_error: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Set the completion text returned by every call.
    pub fn set_response(&self, text: &str) {
        *self.response.lock().unwrap() = text.to_string();
    }

    /// Configure the next completion to fail with an HTTP-level error.
    /// The error is consumed by that one call.
    pub fn set_next_error(&self, message: &str) {
        *self.next_error.lock().unwrap() = Some(message.to_string());
    }

    /// Requests this client has received, in order.
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// How many completions were requested.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if let Some(message) = self.next_error.lock().unwrap().take() {
            return Err(LlmError::Http(message));
        }

        self.requests.lock().unwrap().push(request);

        let text = self.response.lock().unwrap().clone();
        Ok(CompletionResponse {
            text,
            usage: LlmUsage {
                input_tokens: 120,
                output_tokens: 80,
            },
            model: "mock-model".to_string(),
        })
    }
}
