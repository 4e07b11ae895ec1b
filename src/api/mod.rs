//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for the hub, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Questions
//! - `POST /question` - Create a question (form or query `question_text`)
//! - `GET /questions` - List questions keyed by id
//! - `GET /context/{id}` - Staged results for a question
//! - `DELETE /question/{id}` - Delete a question and its context
//! - `POST /question/{id}/simulate` - Run the mock panel on a question
//! - `POST /submit/{id}` - External agent contribution
//!
//! ## Runs (`/api`)
//! - `POST /api/real-agents/run` - Create a question and process it
//! - `GET /api/real-agents/status/{id}` - Poll run progress
//! - `GET /api/agents` - Agents a run would use
//!
//! ## Keys (`/api/keys`)
//! - `POST /api/keys` - Issue an API key (admin password required)
//! - `GET /api/keys` - List keys
//! - `DELETE /api/keys/{key_id}` - Revoke a key
//!
//! ## Health (`/api/health`)
//! - `GET /api/health` - Health check endpoint
//!
//! # OpenAPI Documentation
//!
//! The generated document is served at `/api/openapi.json`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use crate::auth::api_keys::{ApiKeyCreated, ApiKeyInfo, ApiKeyList, CreateApiKeyRequest};
use crate::types::{
    AgentInfo, AgentKind, AgentResponse, AgentSubmission, Conclusion, Context, CreateQuestionForm,
    CreateQuestionResponse, Critique, HealthResponse, Position, Question, Research, RunAccepted,
    RunRequest, RunStatusResponse, Source, Stage, StatusMessage,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Multi-Agent Hub API"),
    paths(
        handlers::questions::create_question,
        handlers::questions::list_questions,
        handlers::questions::get_context,
        handlers::questions::delete_question,
        handlers::questions::simulate_question,
        handlers::submissions::submit_contribution,
        handlers::runs::start_run,
        handlers::runs::run_status,
        handlers::runs::list_agents,
        handlers::keys::create_key,
        handlers::keys::list_keys,
        handlers::keys::revoke_key,
        handlers::health::health_check,
    ),
    components(schemas(
        Question,
        Context,
        AgentResponse,
        Critique,
        Research,
        Source,
        Conclusion,
        Position,
        Stage,
        CreateQuestionForm,
        CreateQuestionResponse,
        StatusMessage,
        RunRequest,
        RunAccepted,
        RunStatusResponse,
        AgentSubmission,
        AgentInfo,
        AgentKind,
        HealthResponse,
        CreateApiKeyRequest,
        ApiKeyCreated,
        ApiKeyInfo,
        ApiKeyList,
    )),
    tags(
        (name = "questions", description = "Question store and mock simulation"),
        (name = "runs", description = "Agent runs and progress"),
        (name = "submissions", description = "External agent contributions"),
        (name = "keys", description = "API key management"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
