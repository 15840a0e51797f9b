//! Mock implementations for testing.
//!
//! This module provides a mock completion client that can be used across
//! different test files without duplication.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use switchboard::llm::{CompletionRequest, LLMClient};
use switchboard::types::{AppError, ProviderErrorKind, Result};

/// Mock LLM client with a configurable reply.
///
/// Every request it receives is recorded so tests can inspect what the
/// fallback responder sent.
///
/// # Examples
///
/// ```ignore
/// let client = MockLLMClient::new("Hello, world!");
/// let client = MockLLMClient::failing(ProviderErrorKind::Quota);
/// let client = MockLLMClient::new("late").with_delay(Duration::from_secs(5));
/// ```
#[derive(Clone)]
pub struct MockLLMClient {
    response: String,
    failure: Option<ProviderErrorKind>,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            failure: None,
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock client that always fails with `kind`.
    pub fn failing(kind: ProviderErrorKind) -> Self {
        Self {
            failure: Some(kind),
            ..Self::new("")
        }
    }

    /// Wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn into_arc(self) -> Arc<dyn LLMClient> {
        Arc::new(self)
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.failure {
            Some(kind) => Err(AppError::provider(kind, "mock failure")),
            None => Ok(self.response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
