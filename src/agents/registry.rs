//! Agent Registry
//!
//! Builds the ordered agent list for a run from the hub configuration.
//!
//! ## Real agents
//!
//! An agent is created as an [`LlmAgent`] only when its provider's API key is
//! present and the provider is compiled in. Agents that cannot be created are
//! left out. When no real agent can be created at all, the whole panel is
//! mocked so a run always has participants.

use crate::agents::{Agent, LlmAgent, MockAgent};
use crate::llm::Provider;
use crate::types::AgentInfo;
use crate::utils::toml_config::{AgentConfig, HubConfig};
use std::sync::Arc;

/// Creates agent instances from configuration
pub struct AgentRegistry {
    config: Arc<HubConfig>,
}

impl AgentRegistry {
    pub fn new(config: Arc<HubConfig>) -> Self {
        Self { config }
    }

    /// Mock stand-ins for every configured agent, in pipeline order
    pub fn mock_agents(&self) -> Vec<Box<dyn Agent>> {
        self.config
            .agents
            .iter()
            .map(|a| Box::new(MockAgent::new(&a.id, &a.name)) as Box<dyn Agent>)
            .collect()
    }

    async fn create_llm_agent(&self, agent: &AgentConfig) -> Option<Box<dyn Agent>> {
        let provider_config = self.config.get_provider(&agent.provider)?;

        let Some(api_key) = self.config.provider_api_key(provider_config) else {
            tracing::warn!(
                agent_id = %agent.id,
                env = provider_config.api_key_env(),
                "API key not found, agent will not be available"
            );
            return None;
        };

        let provider = Provider::from_agent_config(agent, provider_config, api_key);
        match provider.create_client().await {
            Ok(client) => {
                tracing::info!(agent_id = %agent.id, provider = provider.name(), model = provider.model(), "Initialized agent");
                let llm_agent = LlmAgent::new(&agent.id, &agent.name, agent.persona.profile(), client)
                    .with_limits(self.config.orchestrator.clone());
                Some(Box::new(llm_agent))
            }
            Err(e) => {
                tracing::warn!(agent_id = %agent.id, error = %e, "Failed to create LLM client");
                None
            }
        }
    }

    /// Build the agents for a run.
    pub async fn build(&self, use_real_agents: bool) -> Vec<Box<dyn Agent>> {
        if !use_real_agents {
            tracing::info!("Initializing mock agents");
            return self.mock_agents();
        }

        let mut agents = Vec::with_capacity(self.config.agents.len());
        for agent in &self.config.agents {
            if let Some(created) = self.create_llm_agent(agent).await {
                agents.push(created);
            }
        }

        if agents.is_empty() {
            tracing::warn!("No API keys available for real agents, falling back to mock agents");
            return self.mock_agents();
        }
        agents
    }

    /// Describe the agents a run would use, without keeping them.
    pub async fn list(&self, use_real_agents: bool) -> Vec<AgentInfo> {
        self.build(use_real_agents)
            .await
            .iter()
            .map(|agent| agent.info())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgentKind;

    fn config_without_keys() -> HubConfig {
        HubConfig::from_toml_str(
            r#"
[providers.openai]
type = "openai"
api_key_env = "AGENT_HUB_TEST_UNSET_OPENAI_KEY"

[[agents]]
id = "agent-gpt"
name = "GPT Assistant"
provider = "openai"
model = "gpt-4o"
persona = "gpt"

[[agents]]
id = "agent-grok"
name = "Grok AI"
provider = "openai"
model = "sonar"
persona = "grok"
"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_mock_agents_follow_config_order() {
        let registry = AgentRegistry::new(Arc::new(config_without_keys()));
        let agents = registry.build(false).await;
        let ids: Vec<_> = agents.iter().map(|a| a.id().to_string()).collect();
        assert_eq!(ids, vec!["agent-gpt", "agent-grok"]);
    }

    #[tokio::test]
    async fn test_real_agents_fall_back_to_mocks_without_keys() {
        let registry = AgentRegistry::new(Arc::new(config_without_keys()));
        let infos = registry.list(true).await;

        assert_eq!(infos.len(), 2);
        assert!(infos.iter().all(|info| info.kind == AgentKind::Mock));
    }

    #[tokio::test]
    async fn test_default_config_has_three_mock_agents() {
        let registry = AgentRegistry::new(Arc::new(HubConfig::default()));
        let infos = registry.list(false).await;
        let names: Vec<_> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["GPT Assistant", "Claude AI", "Grok AI"]);
    }
}
