//! # Agent Hub - Multi-Agent Question Answering
//!
//! A small server that poses a question to a panel of AI agents and collects
//! their work in four ordered stages: response, critique, research and
//! conclusion. Results accumulate per question in an in-memory store and are
//! browsable through an embedded web UI or the JSON API.
//!
//! ## Overview
//!
//! The hub can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `agent-hub` binary
//! 2. **As a library** - Embed the router or drive the orchestrator directly
//!
//! ### Running a question in-process
//!
//! ```rust,ignore
//! use agent_hub::{AgentRegistry, HubConfig, HubStore, Orchestrator};
//! use std::sync::Arc;
//!
//! let config = Arc::new(HubConfig::default());
//! let store = Arc::new(HubStore::new());
//! let agents = AgentRegistry::new(config).build(false).await;
//!
//! let question = store.create_question("Is nuclear power sustainable?");
//! Orchestrator::new(store.clone())
//!     .run(&question.id, &agents, false)
//!     .await?;
//! let context = store.get_context(&question.id);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `openai` | OpenAI-compatible providers (GPT, Grok) (default) |
//! | `anthropic` | Anthropic Messages API (default) |
//!
//! Mock agents are always available and need no provider.
//!
//! ## Modules
//!
//! - [`agents`] - Mock and LLM-backed agents, personas, and the registry
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - API keys for externally hosted agents
//! - [`llm`] - LLM client implementations
//! - [`orchestrator`] - Staged pipeline over a panel of agents
//! - [`store`] - In-memory question, context and run storage
//! - [`types`] - Domain records, API types and error handling
//! - [`web`] - Embedded browser UI

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Agent implementations and the configured panel.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// API key authentication for external agents.
pub mod auth;
/// Command line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Staged multi-agent pipeline.
pub mod orchestrator;
/// In-memory storage.
pub mod store;
/// Core types (records, requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;
/// Embedded browser UI.
pub mod web;

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

// Re-export commonly used types
pub use agents::{Agent, AgentRegistry};
pub use auth::ApiKeyRegistry;
pub use llm::{LLMClient, Provider};
pub use orchestrator::Orchestrator;
pub use store::HubStore;
pub use types::{AppError, Result};
pub use utils::toml_config::HubConfig;

/// Largest request body accepted by any route.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<HubConfig>,
    /// Questions, contexts and runs
    pub store: Arc<HubStore>,
    /// Builds the agent panel for a run
    pub agents: Arc<AgentRegistry>,
    /// Keys issued to external agents
    pub api_keys: Arc<ApiKeyRegistry>,
    /// Runs pipelines in the background
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(config: HubConfig) -> Self {
        let config = Arc::new(config);
        let store = Arc::new(HubStore::new());
        Self {
            agents: Arc::new(AgentRegistry::new(config.clone())),
            api_keys: Arc::new(ApiKeyRegistry::new()),
            orchestrator: Orchestrator::new(store.clone()),
            store,
            config,
        }
    }
}

/// Full application router with tracing, CORS and body limit layers.
pub fn build_router(state: AppState) -> Router {
    api::routes::create_router()
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
