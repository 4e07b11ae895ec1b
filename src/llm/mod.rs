//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for the hosted models behind the
//! real agents. Provider-specific code sits behind the [`LLMClient`] trait so
//! agents never know which API they are talking to.
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `openai` - OpenAI API and compatible endpoints (GPT, Perplexity)
//! - `anthropic` - Anthropic Messages API (Claude)
//!
//! # Example
//!
//! ```ignore
//! use agent_hub::llm::Provider;
//!
//! let client = Provider::from_agent_config(&agent, &provider_config, api_key)
//!     .create_client()
//!     .await?;
//! let answer = client.generate_with_system("Be brief.", "What is 2+2?").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "anthropic")]
pub mod anthropic;

pub use client::{LLMClient, ModelParams, Provider, DEFAULT_MAX_TOKENS};
