//! Anthropic Claude LLM client implementation
//!
//! Talks to the Messages API directly over `reqwest`.
//!
//! # Features
//!
//! Enable with the `anthropic` feature flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_hub::llm::{LLMClient, ModelParams, Provider};
//!
//! let provider = Provider::Anthropic {
//!     api_key: "sk-ant-...".to_string(),
//!     api_base: "https://api.anthropic.com".to_string(),
//!     model: "claude-3-5-sonnet-20241022".to_string(),
//!     params: ModelParams::default(),
//! };
//! let client = provider.create_client().await?;
//! let response = client.generate("Hello!").await?;
//! ```

use crate::llm::client::{LLMClient, ModelParams};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Claude client for API-based inference
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    params: ModelParams,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl AnthropicClient {
    /// Create a new Anthropic client
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key
    /// * `api_base` - API root, e.g. `https://api.anthropic.com`
    /// * `model` - Model identifier (e.g., "claude-3-5-sonnet-20241022")
    pub fn new(api_key: String, api_base: String, model: String) -> Result<Self> {
        Self::with_params(api_key, api_base, model, ModelParams::default())
    }

    /// Create a new Anthropic client with model parameters
    pub fn with_params(
        api_key: String,
        api_base: String,
        model: String,
        params: ModelParams,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = params.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::LLM(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            params,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.api_base)
    }
}

#[async_trait]
impl LLMClient for AnthropicClient {
    async fn generate_with_limit(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String> {
        let mut body = json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        });
        if !system.is_empty() {
            body["system"] = json!(system);
        }
        if let Some(temperature) = self.params.temperature {
            body["temperature"] = json!(temperature);
        }

        tracing::debug!(model = %self.model, max_tokens, "Sending Anthropic messages request");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLM(format!("Anthropic request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLM(format!(
                "Anthropic API error ({}): {}",
                status, text
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLM(format!("Invalid Anthropic response: {}", e)))?;

        let text: String = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(AppError::LLM("No text content from Anthropic".to_string()));
        }
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
