//! TOML-based configuration for the hub
//!
//! The configuration file (`hub.toml` by default) declares the server
//! settings, the LLM providers and the ordered list of agents that take part
//! in every run. Secrets are never stored inline: providers name the
//! environment variable that holds their API key.
//!
//! When the file is absent the built-in defaults describe the three standard
//! agents (GPT Assistant, Claude AI and Grok AI).

use crate::agents::persona::PersonaKind;
use crate::types::Stage;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Root configuration structure loaded from hub.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    /// Named LLM provider configurations
    #[serde(default = "default_providers")]
    pub providers: BTreeMap<String, ProviderConfig>,

    /// Agents in pipeline order
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentConfig>,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            providers: default_providers(),
            agents: default_agents(),
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= Auth Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable holding the admin password for key management
    #[serde(default = "default_admin_password_env")]
    pub admin_password_env: String,

    /// Require `X-API-Key` on external agent submissions
    #[serde(default)]
    pub require_api_key: bool,
}

fn default_admin_password_env() -> String {
    "HUB_ADMIN_PASSWORD".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_password_env: default_admin_password_env(),
            require_api_key: false,
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// OpenAI or any OpenAI-compatible endpoint (Perplexity, OpenRouter, ...)
    OpenAI {
        /// Environment variable containing API key
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    Anthropic {
        /// Environment variable containing API key
        api_key_env: String,
        #[serde(default = "default_anthropic_base")]
        api_base: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl ProviderConfig {
    pub fn api_key_env(&self) -> &str {
        match self {
            ProviderConfig::OpenAI { api_key_env, .. }
            | ProviderConfig::Anthropic { api_key_env, .. } => api_key_env,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProviderConfig::OpenAI { .. } => "openai",
            ProviderConfig::Anthropic { .. } => "anthropic",
        }
    }
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_base() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_providers() -> BTreeMap<String, ProviderConfig> {
    let mut providers = BTreeMap::new();
    providers.insert(
        "openai".to_string(),
        ProviderConfig::OpenAI {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_base: default_openai_base(),
            timeout_secs: default_timeout_secs(),
        },
    );
    providers.insert(
        "anthropic".to_string(),
        ProviderConfig::Anthropic {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_base: default_anthropic_base(),
            timeout_secs: default_timeout_secs(),
        },
    );
    providers.insert(
        "perplexity".to_string(),
        ProviderConfig::OpenAI {
            api_key_env: "PERPLEXITY_API_KEY".to_string(),
            api_base: "https://api.perplexity.ai".to_string(),
            timeout_secs: default_timeout_secs(),
        },
    );
    providers
}

// ============= Agent Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Stable identifier used as the context key (e.g. `agent-gpt`)
    pub id: String,

    /// Display name
    pub name: String,

    /// Reference to a provider name defined in [providers]
    pub provider: String,

    /// Model identifier passed to the provider
    pub model: String,

    #[serde(default)]
    pub persona: PersonaKind,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_agents() -> Vec<AgentConfig> {
    vec![
        AgentConfig {
            id: "agent-gpt".to_string(),
            name: "GPT Assistant".to_string(),
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            persona: PersonaKind::Gpt,
            temperature: default_temperature(),
        },
        AgentConfig {
            id: "agent-claude".to_string(),
            name: "Claude AI".to_string(),
            provider: "anthropic".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            persona: PersonaKind::Claude,
            temperature: default_temperature(),
        },
        AgentConfig {
            id: "agent-grok".to_string(),
            name: "Grok AI".to_string(),
            provider: "perplexity".to_string(),
            model: "llama-3.1-sonar-small-128k-online".to_string(),
            persona: PersonaKind::Grok,
            temperature: default_temperature(),
        },
    ]
}

// ============= Orchestrator Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default = "default_response_tokens")]
    pub response_max_tokens: u32,

    #[serde(default = "default_critique_tokens")]
    pub critique_max_tokens: u32,

    #[serde(default = "default_research_tokens")]
    pub research_max_tokens: u32,

    #[serde(default = "default_conclusion_tokens")]
    pub conclusion_max_tokens: u32,
}

fn default_response_tokens() -> u32 {
    1000
}

fn default_critique_tokens() -> u32 {
    1000
}

fn default_research_tokens() -> u32 {
    1200
}

fn default_conclusion_tokens() -> u32 {
    1500
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            response_max_tokens: default_response_tokens(),
            critique_max_tokens: default_critique_tokens(),
            research_max_tokens: default_research_tokens(),
            conclusion_max_tokens: default_conclusion_tokens(),
        }
    }
}

impl OrchestratorConfig {
    pub fn max_tokens(&self, stage: Stage) -> u32 {
        match stage {
            Stage::Response => self.response_max_tokens,
            Stage::Critique => self.critique_max_tokens,
            Stage::Research => self.research_max_tokens,
            Stage::Conclusion => self.conclusion_max_tokens,
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Configuration warnings that don't prevent operation but may indicate issues
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub kind: ConfigWarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarningKind {
    UnusedProvider,
    MissingApiKey,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Agent id '{0}' is defined more than once")]
    DuplicateAgent(String),

    #[error("Provider '{0}' referenced by agent '{1}' does not exist")]
    MissingProvider(String, String),
}

impl HubConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load the file if it exists, otherwise fall back to the built-in defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            info!(path = %path.display(), "No configuration file found, using defaults");
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: HubConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if agent.id.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Agent '{}' has an empty id",
                    agent.name
                )));
            }
            if !seen.insert(agent.id.as_str()) {
                return Err(ConfigError::DuplicateAgent(agent.id.clone()));
            }
            if !self.providers.contains_key(&agent.provider) {
                return Err(ConfigError::MissingProvider(
                    agent.provider.clone(),
                    agent.id.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Validate configuration with warnings for unused or unusable items
    pub fn validate_with_warnings(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        self.validate()?;

        let referenced: HashSet<_> = self.agents.iter().map(|a| a.provider.as_str()).collect();

        let mut warnings: Vec<ConfigWarning> = self
            .providers
            .keys()
            .filter(|name| !referenced.contains(name.as_str()))
            .map(|name| ConfigWarning {
                kind: ConfigWarningKind::UnusedProvider,
                message: format!(
                    "Provider '{}' is defined but not referenced by any agent",
                    name
                ),
            })
            .collect();

        for agent in &self.agents {
            if let Some(provider) = self.providers.get(&agent.provider) {
                if self.provider_api_key(provider).is_none() {
                    warnings.push(ConfigWarning {
                        kind: ConfigWarningKind::MissingApiKey,
                        message: format!(
                            "Agent '{}' needs {} to run against its provider; it is skipped in real-agent runs",
                            agent.id,
                            provider.api_key_env()
                        ),
                    });
                }
            }
        }

        Ok(warnings)
    }

    /// Get a resolved value from an env var reference; empty values count as unset
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.trim().is_empty())
    }

    pub fn provider_api_key(&self, provider: &ProviderConfig) -> Option<String> {
        self.resolve_env(provider.api_key_env())
    }

    pub fn admin_password(&self) -> Option<String> {
        self.resolve_env(&self.auth.admin_password_env)
    }

    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }

    pub fn get_agent(&self, id: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.id == id)
    }
}
