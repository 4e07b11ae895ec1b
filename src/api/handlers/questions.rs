//! Question and context handlers.
//!
//! These back the Home view: create a question, list and inspect questions,
//! delete them, and run the mock pipeline on an existing one.

use crate::{
    types::{
        AppError, Context, CreateQuestionForm, CreateQuestionResponse, Question, Result,
        RunAccepted, StatusMessage,
    },
    AppState,
};
use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    http::StatusCode,
    Form, Json,
};
use std::collections::BTreeMap;

/// Create a question from a form field or query parameter `question_text`.
#[utoipa::path(
    post,
    path = "/question",
    request_body(content = CreateQuestionForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Question created", body = CreateQuestionResponse),
        (status = 400, description = "Missing or blank question text")
    ),
    tag = "questions"
)]
pub async fn create_question(
    State(state): State<AppState>,
    Query(query): Query<CreateQuestionForm>,
    form: std::result::Result<Form<CreateQuestionForm>, FormRejection>,
) -> Result<Json<CreateQuestionResponse>> {
    let text = form
        .ok()
        .and_then(|Form(f)| f.question_text)
        .or(query.question_text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Question text is required".to_string()))?;

    let question = state.store.create_question(&text);

    Ok(Json(CreateQuestionResponse {
        question_id: question.id,
        message: "Question created successfully".to_string(),
    }))
}

/// List every question, keyed by id.
#[utoipa::path(
    get,
    path = "/questions",
    responses((status = 200, description = "All questions keyed by id")),
    tag = "questions"
)]
pub async fn list_questions(State(state): State<AppState>) -> Json<BTreeMap<String, Question>> {
    Json(state.store.list_questions())
}

#[utoipa::path(
    get,
    path = "/context/{question_id}",
    responses(
        (status = 200, description = "Context for the question", body = Context),
        (status = 404, description = "Question not found")
    ),
    params(("question_id" = String, Path, description = "Question id")),
    tag = "questions"
)]
pub async fn get_context(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<Json<Context>> {
    state
        .store
        .get_context(&question_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Question {} not found", question_id)))
}

#[utoipa::path(
    delete,
    path = "/question/{question_id}",
    responses(
        (status = 200, description = "Question deleted", body = StatusMessage),
        (status = 404, description = "Question not found")
    ),
    params(("question_id" = String, Path, description = "Question id")),
    tag = "questions"
)]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<Json<StatusMessage>> {
    state.store.delete_question(&question_id)?;
    Ok(Json(StatusMessage::success("Question deleted successfully")))
}

/// Run the mock pipeline on an existing question in the background.
#[utoipa::path(
    post,
    path = "/question/{question_id}/simulate",
    responses(
        (status = 202, description = "Simulation started", body = RunAccepted),
        (status = 400, description = "A run is already in progress"),
        (status = 404, description = "Question not found")
    ),
    params(("question_id" = String, Path, description = "Question id")),
    tag = "questions"
)]
pub async fn simulate_question(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<(StatusCode, Json<RunAccepted>)> {
    if state.store.get_question(&question_id).is_none() {
        return Err(AppError::NotFound(format!(
            "Question {} not found",
            question_id
        )));
    }

    let agents = state.agents.build(false).await;
    state
        .orchestrator
        .spawn(question_id.clone(), agents, false)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(RunAccepted {
            question_id,
            status: "processing".to_string(),
            message: "Simulation started".to_string(),
        }),
    ))
}
