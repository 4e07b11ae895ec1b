//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Health check handler.
pub mod health;
/// API key management handlers.
pub mod keys;
/// Question, context and mock simulation handlers.
pub mod questions;
/// Real-agent run and agent listing handlers.
pub mod runs;
/// External agent submission handler.
pub mod submissions;
