use crate::auth::api_keys::AuthenticatedAgent;
use crate::types::AppError;
use crate::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header external agents use to present their key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor for the agent behind an `X-API-Key` header.
///
/// Holds `None` when no key was sent and keys are optional. A key that is
/// sent is always checked, and a missing key is rejected when
/// `auth.require_api_key` is set.
pub struct ApiKeyAgent(pub Option<AuthenticatedAgent>);

impl FromRequestParts<AppState> for ApiKeyAgent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|k| !k.is_empty());

        match key {
            Some(key) => {
                let agent = state.api_keys.authenticate(key)?;
                tracing::info!(agent_id = %agent.agent_id, "Authenticated request from agent");
                Ok(ApiKeyAgent(Some(agent)))
            }
            None if state.config.auth.require_api_key => {
                tracing::warn!("Missing API key in request");
                Err(AppError::Auth("API key is required".to_string()))
            }
            None => Ok(ApiKeyAgent(None)),
        }
    }
}
