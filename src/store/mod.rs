//! In-memory question and context store.
//!
//! All hub state lives here: questions, the context accumulated for each
//! question, and the status of any orchestration run. Nothing is persisted;
//! dropping the store discards everything.
//!
//! A single [`parking_lot::RwLock`] guards one inner struct so a question,
//! its context and its run status always change together. The lock is never
//! held across an `.await`.

use crate::types::{
    AgentResponse, AppError, Conclusion, Context, Critique, Question, Research, Result, RunState,
    RunStatus, Stage,
};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

#[derive(Default)]
struct Inner {
    questions: BTreeMap<String, Question>,
    contexts: HashMap<String, Context>,
    runs: HashMap<String, RunStatus>,
}

/// Shared store for questions, contexts and run progress.
#[derive(Default)]
pub struct HubStore {
    inner: RwLock<Inner>,
}

fn not_found(question_id: &str) -> AppError {
    AppError::NotFound(format!("Question {} not found", question_id))
}

impl HubStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ============= Questions =============

    /// Create a question and its empty context.
    pub fn create_question(&self, text: &str) -> Question {
        let question = Question::new(text);
        let context = Context::new(&question);

        let mut inner = self.inner.write();
        inner.contexts.insert(question.id.clone(), context);
        inner.questions.insert(question.id.clone(), question.clone());

        tracing::info!(question_id = %question.id, "Created question");
        question
    }

    pub fn get_question(&self, question_id: &str) -> Option<Question> {
        self.inner.read().questions.get(question_id).cloned()
    }

    pub fn list_questions(&self) -> BTreeMap<String, Question> {
        self.inner.read().questions.clone()
    }

    /// Remove a question together with its context and run status.
    pub fn delete_question(&self, question_id: &str) -> Result<()> {
        let mut inner = self.inner.write();
        inner
            .questions
            .remove(question_id)
            .ok_or_else(|| not_found(question_id))?;
        inner.contexts.remove(question_id);
        inner.runs.remove(question_id);

        tracing::info!(question_id, "Deleted question");
        Ok(())
    }

    // ============= Context =============

    pub fn get_context(&self, question_id: &str) -> Option<Context> {
        self.inner.read().contexts.get(question_id).cloned()
    }

    fn with_context<T>(&self, question_id: &str, f: impl FnOnce(&mut Context) -> T) -> Result<T> {
        let mut inner = self.inner.write();
        let context = inner
            .contexts
            .get_mut(question_id)
            .ok_or_else(|| not_found(question_id))?;
        Ok(f(context))
    }

    pub fn record_response(
        &self,
        question_id: &str,
        agent_id: &str,
        response: AgentResponse,
    ) -> Result<()> {
        self.with_context(question_id, |ctx| {
            ctx.responses.insert(agent_id.to_string(), response);
        })?;
        tracing::debug!(question_id, agent_id, stage = %Stage::Response, "Recorded entry");
        Ok(())
    }

    pub fn record_critique(&self, question_id: &str, agent_id: &str, critique: Critique) -> Result<()> {
        let target = critique.target_agent.clone();
        self.with_context(question_id, |ctx| {
            ctx.critiques
                .entry(agent_id.to_string())
                .or_default()
                .insert(target, critique);
        })?;
        tracing::debug!(question_id, agent_id, stage = %Stage::Critique, "Recorded entry");
        Ok(())
    }

    pub fn record_research(&self, question_id: &str, agent_id: &str, research: Research) -> Result<()> {
        self.with_context(question_id, |ctx| {
            ctx.research.insert(agent_id.to_string(), research);
        })?;
        tracing::debug!(question_id, agent_id, stage = %Stage::Research, "Recorded entry");
        Ok(())
    }

    pub fn record_conclusion(
        &self,
        question_id: &str,
        agent_id: &str,
        conclusion: Conclusion,
    ) -> Result<()> {
        self.with_context(question_id, |ctx| {
            ctx.conclusions.insert(agent_id.to_string(), conclusion);
        })?;
        tracing::debug!(question_id, agent_id, stage = %Stage::Conclusion, "Recorded entry");
        Ok(())
    }

    // ============= Runs =============

    /// Register a run for an existing question. A question holds at most
    /// one pending or running run; finished runs are replaced.
    pub fn start_run(&self, question_id: &str, status: RunStatus) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.questions.contains_key(question_id) {
            return Err(not_found(question_id));
        }
        if let Some(run) = inner.runs.get(question_id) {
            if matches!(run.state, RunState::Pending | RunState::Running) {
                return Err(AppError::InvalidInput(
                    "A run is already in progress for this question".to_string(),
                ));
            }
        }
        inner.runs.insert(question_id.to_string(), status);
        Ok(())
    }

    pub fn run_status(&self, question_id: &str) -> Option<RunStatus> {
        self.inner.read().runs.get(question_id).cloned()
    }

    fn with_run<T>(&self, question_id: &str, f: impl FnOnce(&mut RunStatus) -> T) -> Result<T> {
        let mut inner = self.inner.write();
        let run = inner
            .runs
            .get_mut(question_id)
            .ok_or_else(|| not_found(question_id))?;
        Ok(f(run))
    }

    /// Advance a run. `completed_units` never moves backwards and finished
    /// runs are left untouched.
    pub fn update_run(&self, question_id: &str, stage: Stage, completed_units: usize) -> Result<RunStatus> {
        self.with_run(question_id, |run| {
            if matches!(run.state, RunState::Pending | RunState::Running) {
                run.state = RunState::Running;
                run.stage = Some(stage);
                run.completed_units = run.completed_units.max(completed_units.min(run.total_units));
            }
            run.clone()
        })
    }

    pub fn finish_run(&self, question_id: &str) -> Result<RunStatus> {
        self.with_run(question_id, |run| {
            run.state = RunState::Complete;
            run.completed_units = run.total_units;
            run.finished_at = Some(Utc::now());
            run.clone()
        })
    }

    pub fn fail_run(&self, question_id: &str, error: &str) -> Result<RunStatus> {
        self.with_run(question_id, |run| {
            run.state = RunState::Failed;
            run.error = Some(error.to_string());
            run.finished_at = Some(Utc::now());
            run.clone()
        })
    }
}
