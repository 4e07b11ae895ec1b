//! API key management handlers.
//!
//! Every route here requires the admin password configured through
//! `auth.admin_password_env`.

use crate::{
    auth::api_keys::{verify_admin, AdminQuery, ApiKeyCreated, ApiKeyList, CreateApiKeyRequest},
    types::{Result, StatusMessage},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};

fn check_admin(state: &AppState, provided: Option<&str>) -> Result<()> {
    let configured = state.config.admin_password();
    verify_admin(configured.as_deref(), provided)
}

/// Issue a key for an external agent. The key is only ever shown here.
#[utoipa::path(
    post,
    path = "/api/keys",
    request_body = CreateApiKeyRequest,
    responses(
        (status = 200, description = "Key created", body = ApiKeyCreated),
        (status = 400, description = "Missing agent fields"),
        (status = 401, description = "Invalid admin password")
    ),
    tag = "keys"
)]
pub async fn create_key(
    State(state): State<AppState>,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<Json<ApiKeyCreated>> {
    check_admin(&state, request.admin_password.as_deref())?;
    let created = state.api_keys.create(
        &request.agent_id,
        &request.agent_name,
        request.description.as_deref().unwrap_or_default(),
    )?;
    Ok(Json(created))
}

#[utoipa::path(
    get,
    path = "/api/keys",
    responses(
        (status = 200, description = "Issued keys without their secrets", body = ApiKeyList),
        (status = 401, description = "Invalid admin password")
    ),
    tag = "keys"
)]
pub async fn list_keys(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<ApiKeyList>> {
    check_admin(&state, query.admin_password.as_deref())?;
    let api_keys = state.api_keys.list();
    tracing::info!(count = api_keys.len(), "Listed API keys");
    Ok(Json(ApiKeyList { api_keys }))
}

#[utoipa::path(
    delete,
    path = "/api/keys/{key_id}",
    responses(
        (status = 200, description = "Key revoked", body = StatusMessage),
        (status = 401, description = "Invalid admin password"),
        (status = 404, description = "Key not found")
    ),
    params(("key_id" = String, Path, description = "Key id")),
    tag = "keys"
)]
pub async fn revoke_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<StatusMessage>> {
    check_admin(&state, query.admin_password.as_deref())?;
    state.api_keys.revoke(&key_id)?;
    Ok(Json(StatusMessage::success("API key revoked successfully")))
}
