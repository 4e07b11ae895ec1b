//! External agent submissions.
//!
//! Agents running outside the hub push one stage entry at a time. Payloads
//! use the same JSON shape as the records stored in a context.

use crate::{
    auth::ApiKeyAgent,
    types::{
        AgentResponse, AgentSubmission, AppError, Conclusion, Critique, Research, Result, Stage,
        StatusMessage,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::de::DeserializeOwned;

fn parse_payload<T: DeserializeOwned>(stage: Stage, payload: serde_json::Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| AppError::InvalidInput(format!("Invalid {} payload: {}", stage, e)))
}

/// Record one stage entry from an external agent.
#[utoipa::path(
    post,
    path = "/submit/{question_id}",
    request_body = AgentSubmission,
    responses(
        (status = 200, description = "Contribution recorded", body = StatusMessage),
        (status = 400, description = "Invalid stage or payload"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Question not found")
    ),
    params(("question_id" = String, Path, description = "Question id")),
    tag = "submissions"
)]
pub async fn submit_contribution(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    ApiKeyAgent(authenticated): ApiKeyAgent,
    Json(submission): Json<AgentSubmission>,
) -> Result<Json<StatusMessage>> {
    let stage: Stage = submission.stage.parse()?;

    if submission.agent_id.trim().is_empty() {
        return Err(AppError::InvalidInput("agent_id is required".to_string()));
    }
    if let Some(agent) = &authenticated {
        if agent.agent_id != submission.agent_id {
            return Err(AppError::Auth(format!(
                "API key does not belong to agent {}",
                submission.agent_id
            )));
        }
    }
    if state.store.get_question(&question_id).is_none() {
        return Err(AppError::NotFound(format!(
            "Question {} not found",
            question_id
        )));
    }

    let agent_id = submission.agent_id.as_str();
    let agent_name = submission
        .agent_name
        .clone()
        .or_else(|| authenticated.as_ref().map(|a| a.agent_name.clone()))
        .unwrap_or_else(|| agent_id.to_string());
    let payload = submission.payload.clone();

    match stage {
        Stage::Response => {
            let mut response: AgentResponse = parse_payload(stage, payload)?;
            response.validate()?;
            if response.agent_name.is_empty() {
                response.agent_name = agent_name;
            }
            state.store.record_response(&question_id, agent_id, response)?;
        }
        Stage::Critique => {
            let mut critique: Critique = parse_payload(stage, payload)?;
            critique.validate()?;
            if critique.agent_name.is_empty() {
                critique.agent_name = agent_name;
            }
            state.store.record_critique(&question_id, agent_id, critique)?;
        }
        Stage::Research => {
            let mut research: Research = parse_payload(stage, payload)?;
            research.validate()?;
            if research.agent_name.is_empty() {
                research.agent_name = agent_name;
            }
            state.store.record_research(&question_id, agent_id, research)?;
        }
        Stage::Conclusion => {
            let mut conclusion: Conclusion = parse_payload(stage, payload)?;
            conclusion.validate()?;
            if conclusion.agent_name.is_empty() {
                conclusion.agent_name = agent_name;
            }
            state
                .store
                .record_conclusion(&question_id, agent_id, conclusion)?;
        }
    }

    tracing::info!(question_id = %question_id, agent_id, stage = %stage, "Recorded submission");
    Ok(Json(StatusMessage::success(format!(
        "{} from {} recorded",
        stage, agent_id
    ))))
}
