use crate::llm::client::{LLMClient, ModelParams};
use crate::types::{AppError, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

/// Chat-completions client for OpenAI and OpenAI-compatible endpoints.
pub struct OpenAIClient {
    client: Client<OpenAIConfig>,
    model: String,
    params: ModelParams,
}

impl OpenAIClient {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Self {
            client: Client::with_config(config),
            model,
            params: ModelParams::default(),
        }
    }

    /// Build a client with sampling parameters and an HTTP timeout.
    pub fn with_params(
        api_key: String,
        api_base: String,
        model: String,
        params: ModelParams,
    ) -> Result<Self> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        let mut client = Client::with_config(config);
        if let Some(timeout) = params.timeout {
            let http = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| AppError::LLM(format!("Failed to build HTTP client: {}", e)))?;
            client = client.with_http_client(http);
        }

        Ok(Self {
            client,
            model,
            params,
        })
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate_with_limit(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage::from(system.to_string()),
            ));
        }
        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(prompt.to_string()),
        ));

        let mut builder = CreateChatCompletionRequestArgs::default();
        #[allow(deprecated)]
        builder
            .model(&self.model)
            .messages(messages)
            .max_tokens(max_tokens);
        if let Some(temperature) = self.params.temperature {
            builder.temperature(temperature);
        }
        let request = builder
            .build()
            .map_err(|e| AppError::LLM(format!("Failed to build request: {}", e)))?;

        tracing::debug!(model = %self.model, max_tokens, "Sending chat completion request");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name() {
        let client = OpenAIClient::new(
            "sk-test".to_string(),
            "https://api.perplexity.ai".to_string(),
            "llama-3.1-sonar-small-128k-online".to_string(),
        );
        assert_eq!(client.model_name(), "llama-3.1-sonar-small-128k-online");
    }
}
