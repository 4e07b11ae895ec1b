use crate::api::handlers::{health, keys, questions, runs, submissions};
use crate::api::ApiDoc;
use crate::web;
use crate::AppState;
use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use utoipa::OpenApi;

/// Routes for the HTML views and their embedded assets.
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(web::index))
        .route("/real-agents", get(web::real_agents))
        .route("/static/{*path}", get(web::static_file))
}

/// Question store routes used by the Home view and external agents.
pub fn question_routes() -> Router<AppState> {
    Router::new()
        .route("/question", post(questions::create_question))
        .route("/questions", get(questions::list_questions))
        .route("/context/{question_id}", get(questions::get_context))
        .route("/question/{question_id}", delete(questions::delete_question))
        .route(
            "/question/{question_id}/simulate",
            post(questions::simulate_question),
        )
        .route(
            "/submit/{question_id}",
            post(submissions::submit_contribution),
        )
}

/// JSON API nested under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/agents", get(runs::list_agents))
        .route("/real-agents/run", post(runs::start_run))
        .route("/real-agents/status/{question_id}", get(runs::run_status))
        .route("/keys", get(keys::list_keys).post(keys::create_key))
        .route("/keys/{key_id}", delete(keys::revoke_key))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(ui_routes())
        .merge(question_routes())
        .nest("/api", api_routes())
}
