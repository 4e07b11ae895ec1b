//! Real-agent run handlers.

use crate::{
    types::{AgentInfo, AppError, Result, RunAccepted, RunRequest, RunStatusResponse},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Create a question and process it with the configured agents.
///
/// Returns immediately; poll the status endpoint for progress.
#[utoipa::path(
    post,
    path = "/api/real-agents/run",
    request_body = RunRequest,
    responses(
        (status = 202, description = "Run started", body = RunAccepted),
        (status = 400, description = "Missing or blank question")
    ),
    tag = "runs"
)]
pub async fn start_run(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<(StatusCode, Json<RunAccepted>)> {
    let text = request
        .question
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Question is required".to_string()))?;

    let question = state.store.create_question(text);

    let agents = state.agents.build(request.use_real_agents).await;
    tracing::info!(
        question_id = %question.id,
        use_real_agents = request.use_real_agents,
        agents = agents.len(),
        "Starting run"
    );
    state
        .orchestrator
        .spawn(question.id.clone(), agents, request.use_real_agents)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(RunAccepted {
            question_id: question.id,
            status: "processing".to_string(),
            message: "Question is being processed".to_string(),
        }),
    ))
}

/// Progress of a question's run.
///
/// Questions filled in through `/submit` have no run; their status is
/// derived from the stages present in the context.
#[utoipa::path(
    get,
    path = "/api/real-agents/status/{question_id}",
    responses(
        (status = 200, description = "Run status", body = RunStatusResponse),
        (status = 404, description = "Question not found")
    ),
    params(("question_id" = String, Path, description = "Question id")),
    tag = "runs"
)]
pub async fn run_status(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<Json<RunStatusResponse>> {
    let question = state
        .store
        .get_question(&question_id)
        .ok_or_else(|| AppError::NotFound(format!("Question {} not found", question_id)))?;

    let response = match state.store.run_status(&question_id) {
        Some(run) => RunStatusResponse {
            question_id,
            question_text: question.text,
            status: run.label().to_string(),
            progress: run.progress(),
            stage: run.stage,
            error: run.error,
        },
        None => {
            let (status, progress) = state
                .store
                .get_context(&question_id)
                .map(|ctx| ctx.derived_status())
                .unwrap_or(("pending", 0));
            RunStatusResponse {
                question_id,
                question_text: question.text,
                status: status.to_string(),
                progress,
                stage: None,
                error: None,
            }
        }
    };

    Ok(Json(response))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AgentsQuery {
    /// Describe the real-agent panel instead of the mock one
    #[serde(default)]
    pub use_real_agents: Option<bool>,
}

/// Agents a run would use.
#[utoipa::path(
    get,
    path = "/api/agents",
    params(AgentsQuery),
    responses((status = 200, description = "Agents in pipeline order", body = [AgentInfo])),
    tag = "runs"
)]
pub async fn list_agents(
    State(state): State<AppState>,
    Query(query): Query<AgentsQuery>,
) -> Json<Vec<AgentInfo>> {
    Json(state.agents.list(query.use_real_agents.unwrap_or(true)).await)
}
