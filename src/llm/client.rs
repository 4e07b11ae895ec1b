//! LLM Client abstractions and provider management
//!
//! This module provides a unified interface for the hosted models the hub
//! talks to:
//! - **OpenAI**: OpenAI itself and any OpenAI-compatible endpoint
//!   (the Grok persona runs against Perplexity this way)
//! - **Anthropic**: Claude via the Messages API

use crate::types::{AppError, Result};
use crate::utils::toml_config::{AgentConfig, ProviderConfig};
use async_trait::async_trait;
use std::time::Duration;

/// Token budget used when a caller does not pick one.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing for easy swapping
/// between providers without changing application code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion with a system prompt and an explicit token budget.
    ///
    /// An empty `system` means no system prompt is sent.
    async fn generate_with_limit(&self, system: &str, prompt: &str, max_tokens: u32)
        -> Result<String>;

    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_limit("", prompt, DEFAULT_MAX_TOKENS).await
    }

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.generate_with_limit(system, prompt, DEFAULT_MAX_TOKENS).await
    }

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Sampling parameters applied to every request a client makes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelParams {
    pub temperature: Option<f32>,
    pub timeout: Option<Duration>,
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including compatible APIs such as Perplexity)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4o".to_string(),
    ///     params: ModelParams::default(),
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        params: ModelParams,
    },

    /// Anthropic Claude API provider
    Anthropic {
        api_key: String,
        api_base: String,
        model: String,
        params: ModelParams,
    },
}

impl Provider {
    /// Resolve the provider an agent should talk to.
    pub fn from_agent_config(
        agent: &AgentConfig,
        provider: &ProviderConfig,
        api_key: String,
    ) -> Self {
        match provider {
            ProviderConfig::OpenAI {
                api_base,
                timeout_secs,
                ..
            } => Provider::OpenAI {
                api_key,
                api_base: api_base.clone(),
                model: agent.model.clone(),
                params: ModelParams {
                    temperature: Some(agent.temperature),
                    timeout: Some(Duration::from_secs(*timeout_secs)),
                },
            },
            ProviderConfig::Anthropic {
                api_base,
                timeout_secs,
                ..
            } => Provider::Anthropic {
                api_key,
                api_base: api_base.clone(),
                model: agent.model.clone(),
                params: ModelParams {
                    temperature: Some(agent.temperature),
                    timeout: Some(Duration::from_secs(*timeout_secs)),
                },
            },
        }
    }

    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider was compiled out or the HTTP client
    /// cannot be built.
    pub async fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                params,
            } => Ok(Box::new(super::openai::OpenAIClient::with_params(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                *params,
            )?)),

            #[cfg(feature = "anthropic")]
            Provider::Anthropic {
                api_key,
                api_base,
                model,
                params,
            } => Ok(Box::new(super::anthropic::AnthropicClient::with_params(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                *params,
            )?)),

            #[allow(unreachable_patterns)]
            other => Err(AppError::Config(format!(
                "{} provider is not compiled in; enable the `{}` feature",
                other.name(),
                other.name().to_ascii_lowercase()
            ))),
        }
    }

    /// Check if this provider is compiled into the binary
    pub fn is_implemented(&self) -> bool {
        match self {
            Provider::OpenAI { .. } => cfg!(feature = "openai"),
            Provider::Anthropic { .. } => cfg!(feature = "anthropic"),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Anthropic { .. } => "Anthropic",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Anthropic { model, .. } => model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::persona::PersonaKind;

    fn agent(provider: &str) -> AgentConfig {
        AgentConfig {
            id: "agent-test".to_string(),
            name: "Test".to_string(),
            provider: provider.to_string(),
            model: "test-model".to_string(),
            persona: PersonaKind::Gpt,
            temperature: 0.3,
        }
    }

    #[test]
    fn test_provider_from_agent_config() {
        let provider_config = ProviderConfig::OpenAI {
            api_key_env: "X".to_string(),
            api_base: "https://api.perplexity.ai".to_string(),
            timeout_secs: 12,
        };

        let provider = Provider::from_agent_config(&agent("pplx"), &provider_config, "key".into());
        match &provider {
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                params,
            } => {
                assert_eq!(api_key, "key");
                assert_eq!(api_base, "https://api.perplexity.ai");
                assert_eq!(model, "test-model");
                assert_eq!(params.temperature, Some(0.3));
                assert_eq!(params.timeout, Some(Duration::from_secs(12)));
            }
            other => panic!("unexpected provider {:?}", other),
        }
        assert_eq!(provider.name(), "OpenAI");
        assert_eq!(provider.model(), "test-model");
    }

    #[test]
    fn test_provider_name() {
        let anthropic = Provider::Anthropic {
            api_key: String::new(),
            api_base: String::new(),
            model: String::new(),
            params: ModelParams::default(),
        };
        assert_eq!(anthropic.name(), "Anthropic");
    }

    #[cfg(feature = "anthropic")]
    #[tokio::test]
    async fn test_create_anthropic_client() {
        let provider = Provider::Anthropic {
            api_key: "test".to_string(),
            api_base: "http://localhost:1".to_string(),
            model: "claude-3-haiku".to_string(),
            params: ModelParams::default(),
        };

        assert!(provider.is_implemented());
        let client = match provider.create_client().await {
            Ok(client) => client,
            Err(e) => panic!("client creation failed: {}", e),
        };
        assert_eq!(client.model_name(), "claude-3-haiku");
    }
}
