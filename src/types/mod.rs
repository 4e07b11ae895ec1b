use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Clamp a score into `[0, 1]`; NaN collapses to zero.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn check_unit(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "{} must be between 0 and 1, got {}",
            field, value
        )))
    }
}

// ============= Stages =============

/// One step of the pipeline every agent walks through for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Response,
    Critique,
    Research,
    Conclusion,
}

impl Stage {
    /// Stages in execution order.
    pub const ALL: [Stage; 4] = [
        Stage::Response,
        Stage::Critique,
        Stage::Research,
        Stage::Conclusion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Response => "response",
            Stage::Critique => "critique",
            Stage::Research => "research",
            Stage::Conclusion => "conclusion",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "response" => Ok(Stage::Response),
            "critique" => Ok(Stage::Critique),
            "research" => Ok(Stage::Research),
            "conclusion" => Ok(Stage::Conclusion),
            other => Err(AppError::InvalidInput(format!("Invalid stage: {}", other))),
        }
    }
}

/// Final stance an agent takes in its conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Supportive,
    Cautious,
    Critical,
    #[default]
    Neutral,
    Optimistic,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::Supportive,
        Position::Cautious,
        Position::Critical,
        Position::Neutral,
        Position::Optimistic,
    ];
}

// ============= Questions & Context =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Everything the agents have produced for one question, keyed by agent id.
///
/// Critiques are nested: `critiques[critic_id][target_id]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Context {
    pub question_id: String,
    pub question_text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub responses: BTreeMap<String, AgentResponse>,
    #[serde(default)]
    pub critiques: BTreeMap<String, BTreeMap<String, Critique>>,
    #[serde(default)]
    pub research: BTreeMap<String, Research>,
    #[serde(default)]
    pub conclusions: BTreeMap<String, Conclusion>,
}

impl Context {
    pub fn new(question: &Question) -> Self {
        Self {
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            created_at: question.created_at,
            responses: BTreeMap::new(),
            critiques: BTreeMap::new(),
            research: BTreeMap::new(),
            conclusions: BTreeMap::new(),
        }
    }

    /// Number of entries recorded for a stage (each critique target counts once).
    pub fn stage_len(&self, stage: Stage) -> usize {
        match stage {
            Stage::Response => self.responses.len(),
            Stage::Critique => self.critiques.values().map(BTreeMap::len).sum(),
            Stage::Research => self.research.len(),
            Stage::Conclusion => self.conclusions.len(),
        }
    }

    /// Status for questions filled in by external submissions rather than a run.
    pub fn derived_status(&self) -> (&'static str, u8) {
        if !self.conclusions.is_empty() {
            ("complete", 100)
        } else if !self.research.is_empty() {
            ("research_ready", 75)
        } else if !self.critiques.is_empty() {
            ("critiques_ready", 50)
        } else if !self.responses.is_empty() {
            ("responses_ready", 25)
        } else {
            ("pending", 0)
        }
    }
}

// ============= Stage Records =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AgentResponse {
    #[serde(default)]
    pub agent_name: String,
    pub content: String,
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
    /// Model that produced the record, `null` for mock agents
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentResponse {
    pub fn new(
        agent_name: impl Into<String>,
        content: impl Into<String>,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            content: content.into(),
            confidence: clamp_unit(confidence),
            reasoning: reasoning.into(),
            model: None,
            error: None,
        }
    }

    pub fn failed(agent_name: impl Into<String>, model: Option<&str>, error: &str) -> Self {
        Self {
            agent_name: agent_name.into(),
            content: format!("Error: {}", error),
            confidence: 0.0,
            reasoning: String::new(),
            model: model.map(str::to_string),
            error: Some(error.to_string()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_unit("confidence", self.confidence)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Critique {
    #[serde(default)]
    pub agent_name: String,
    pub target_agent: String,
    pub critique: String,
    pub agreement_level: f64,
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Model that produced the record, `null` for mock agents
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Critique {
    pub fn new(
        agent_name: impl Into<String>,
        target_agent: impl Into<String>,
        critique: impl Into<String>,
        agreement_level: f64,
        key_points: Vec<String>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            target_agent: target_agent.into(),
            critique: critique.into(),
            agreement_level: clamp_unit(agreement_level),
            key_points,
            model: None,
            error: None,
        }
    }

    pub fn failed(
        agent_name: impl Into<String>,
        target_agent: impl Into<String>,
        model: Option<&str>,
        error: &str,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            target_agent: target_agent.into(),
            critique: format!("Error: {}", error),
            agreement_level: 0.5,
            key_points: vec![format!("Error occurred: {}", error)],
            model: model.map(str::to_string),
            error: Some(error.to_string()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_agent.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "critique requires a target_agent".to_string(),
            ));
        }
        check_unit("agreement_level", self.agreement_level)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Source {
    pub title: String,
    pub year: i32,
    pub relevance: f64,
}

impl Source {
    pub fn new(title: impl Into<String>, year: i32, relevance: f64) -> Self {
        Self {
            title: title.into(),
            year,
            relevance: clamp_unit(relevance),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Research {
    #[serde(default)]
    pub agent_name: String,
    pub findings: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub confidence: f64,
    /// Model that produced the record, `null` for mock agents
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Research {
    pub fn new(
        agent_name: impl Into<String>,
        findings: impl Into<String>,
        sources: Vec<Source>,
        confidence: f64,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            findings: findings.into(),
            sources,
            confidence: clamp_unit(confidence),
            model: None,
            error: None,
        }
    }

    pub fn failed(agent_name: impl Into<String>, model: Option<&str>, error: &str) -> Self {
        Self {
            agent_name: agent_name.into(),
            findings: format!("Error: {}", error),
            sources: Vec::new(),
            confidence: 0.0,
            model: model.map(str::to_string),
            error: Some(error.to_string()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_unit("confidence", self.confidence)?;
        for source in &self.sources {
            check_unit("source relevance", source.relevance)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Conclusion {
    #[serde(default)]
    pub agent_name: String,
    pub summary: String,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    pub confidence: f64,
    #[serde(default)]
    pub final_position: Position,
    /// Model that produced the record, `null` for mock agents
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Conclusion {
    pub fn new(
        agent_name: impl Into<String>,
        summary: impl Into<String>,
        key_takeaways: Vec<String>,
        confidence: f64,
        final_position: Position,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            summary: summary.into(),
            key_takeaways,
            confidence: clamp_unit(confidence),
            final_position,
            model: None,
            error: None,
        }
    }

    pub fn failed(agent_name: impl Into<String>, model: Option<&str>, error: &str) -> Self {
        Self {
            agent_name: agent_name.into(),
            summary: format!("Error: {}", error),
            key_takeaways: vec![format!("Error occurred: {}", error)],
            confidence: 0.0,
            final_position: Position::Neutral,
            model: model.map(str::to_string),
            error: Some(error.to_string()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_unit("confidence", self.confidence)
    }
}

// ============= Run Tracking =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Pending,
    Running,
    Complete,
    Failed,
}

/// Number of stage/agent units a run over `agents` agents performs.
pub fn total_units(agents: usize) -> usize {
    if agents == 0 {
        0
    } else {
        3 * agents + agents * (agents - 1)
    }
}

/// Progress of one orchestration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RunStatus {
    pub state: RunState,
    pub stage: Option<Stage>,
    pub completed_units: usize,
    pub total_units: usize,
    pub use_real_agents: bool,
    pub agents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunStatus {
    pub fn new(agents: Vec<String>, use_real_agents: bool) -> Self {
        Self {
            state: RunState::Pending,
            stage: None,
            completed_units: 0,
            total_units: total_units(agents.len()),
            use_real_agents,
            agents,
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Integer percentage; only a completed run reports 100.
    pub fn progress(&self) -> u8 {
        match self.state {
            RunState::Complete => 100,
            _ if self.total_units == 0 => 0,
            _ => {
                let pct = self.completed_units.min(self.total_units) * 100 / self.total_units;
                pct.min(99) as u8
            }
        }
    }

    /// Label reported by the status endpoint.
    pub fn label(&self) -> &'static str {
        match self.state {
            RunState::Pending => "pending",
            RunState::Complete => "complete",
            RunState::Failed => "failed",
            RunState::Running => {
                let n = self.agents.len();
                let responses = n;
                let critiques = responses + n * n.saturating_sub(1);
                let research = critiques + n;
                if n > 0 && self.completed_units >= research {
                    "research_ready"
                } else if n > 0 && self.completed_units >= critiques {
                    "critiques_ready"
                } else if n > 0 && self.completed_units >= responses {
                    "responses_ready"
                } else {
                    "processing"
                }
            }
        }
    }
}

// ============= API Request/Response Types =============

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateQuestionForm {
    #[serde(default)]
    pub question_text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateQuestionResponse {
    pub question_id: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusMessage {
    pub status: String,
    pub message: String,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RunRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default = "default_true")]
    pub use_real_agents: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RunAccepted {
    pub question_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RunStatusResponse {
    pub question_id: String,
    pub question_text: String,
    pub status: String,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A contribution pushed by an external agent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AgentSubmission {
    pub agent_id: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    pub stage: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Mock,
    Llm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AgentInfo {
    pub id: String,
    pub name: String,
    pub kind: AgentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Config(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::LLM(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Auth(msg) => (axum::http::StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
