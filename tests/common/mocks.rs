//! Mock implementations for testing.
//!
//! This module provides a mock LLM client that can be used across different
//! test files without duplication.

use agent_hub::llm::LLMClient;
use agent_hub::types::{AppError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Mock LLM client for testing with configurable responses.
///
/// Every call is recorded as `(system, prompt, max_tokens)` so tests can
/// check what an agent asked for.
#[derive(Clone)]
pub struct MockLLMClient {
    response: String,
    should_fail: bool,
    calls: Arc<Mutex<Vec<(String, String, u32)>>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            should_fail: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle on the recorded calls; survives boxing the client.
    pub fn calls(&self) -> Arc<Mutex<Vec<(String, String, u32)>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate_with_limit(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String> {
        self.calls
            .lock()
            .push((system.to_string(), prompt.to_string(), max_tokens));
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
