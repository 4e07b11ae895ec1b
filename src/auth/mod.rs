//! API key authentication for external agents
//!
//! External agents push contributions through `POST /submit/{question_id}`.
//! They identify themselves with an `X-API-Key` header carrying a key issued
//! through the admin-only `/api/keys` routes.
//!
//! # Module Structure
//!
//! - [`auth::api_keys`](crate::auth::api_keys) - key issuing, hashing, revocation and lookup
//! - [`auth::middleware`](crate::auth::middleware) - Axum extractor for authenticated agents
//!
//! # Security Features
//!
//! - **Random keys**: 32 random bytes, hex encoded
//! - **Hashed storage**: only the SHA-256 digest of a key is kept
//! - **Revocation**: keys are deactivated rather than deleted
//!
//! # Configuration
//!
//! ```toml
//! [auth]
//! admin_password_env = "HUB_ADMIN_PASSWORD"
//! require_api_key = true
//! ```

/// Key registry and admin password checks.
pub mod api_keys;
/// Request extractor for `X-API-Key`.
pub mod middleware;

pub use api_keys::{ApiKeyRegistry, AuthenticatedAgent};
pub use middleware::ApiKeyAgent;
