//! Pipeline orchestrator
//!
//! Runs every agent through the four stages of a question, strictly in
//! order and one agent call at a time:
//!
//! 1. each agent answers the question
//! 2. each agent critiques every other agent's answer
//! 3. each agent researches the question
//! 4. each agent concludes, seeing the context built so far
//!
//! Results are written to the [`HubStore`] as soon as they arrive. A failing
//! agent call becomes an error entry for that agent and the run carries on.

use crate::agents::Agent;
use crate::store::HubStore;
use crate::types::{
    AgentResponse, AppError, Conclusion, Critique, Research, Result, RunStatus, Stage,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Drives runs against a shared store.
#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<HubStore>,
    observer: Option<UnboundedSender<RunStatus>>,
}

/// Counts finished units and publishes progress after each one.
struct Progress<'a> {
    orchestrator: &'a Orchestrator,
    question_id: &'a str,
    completed: usize,
}

impl Progress<'_> {
    fn advance(&mut self, stage: Stage) -> Result<()> {
        self.completed += 1;
        let status = self
            .orchestrator
            .store
            .update_run(self.question_id, stage, self.completed)?;
        self.orchestrator.notify(&status);
        Ok(())
    }
}

impl Orchestrator {
    pub fn new(store: Arc<HubStore>) -> Self {
        Self {
            store,
            observer: None,
        }
    }

    /// Receive a snapshot of the run status after every change.
    pub fn with_observer(mut self, observer: UnboundedSender<RunStatus>) -> Self {
        self.observer = Some(observer);
        self
    }

    fn notify(&self, status: &RunStatus) {
        if let Some(observer) = &self.observer {
            // A dropped receiver only means nobody is watching anymore.
            let _ = observer.send(status.clone());
        }
    }

    /// Register a pending run for an existing question.
    pub fn begin(
        &self,
        question_id: &str,
        agents: &[Box<dyn Agent>],
        use_real_agents: bool,
    ) -> Result<RunStatus> {
        let ids = agents.iter().map(|a| a.id().to_string()).collect();
        let status = RunStatus::new(ids, use_real_agents);
        self.store.start_run(question_id, status.clone())?;
        self.notify(&status);
        Ok(status)
    }

    /// Register and execute a run, waiting for it to finish.
    pub async fn run(
        &self,
        question_id: &str,
        agents: &[Box<dyn Agent>],
        use_real_agents: bool,
    ) -> Result<RunStatus> {
        self.begin(question_id, agents, use_real_agents)?;
        self.execute(question_id, agents).await
    }

    /// Register a run and execute it on a background task.
    pub fn spawn(
        &self,
        question_id: String,
        agents: Vec<Box<dyn Agent>>,
        use_real_agents: bool,
    ) -> Result<RunStatus> {
        let status = self.begin(&question_id, &agents, use_real_agents)?;
        let orchestrator = self.clone();

        tokio::spawn(async move {
            if let Err(e) = orchestrator.execute(&question_id, &agents).await {
                warn!(question_id = %question_id, error = %e, "Run ended early");
            }
        });

        Ok(status)
    }

    /// Execute a run registered with [`begin`](Self::begin).
    pub async fn execute(&self, question_id: &str, agents: &[Box<dyn Agent>]) -> Result<RunStatus> {
        let question = self
            .store
            .get_question(question_id)
            .ok_or_else(|| AppError::NotFound(format!("Question {} not found", question_id)))?;

        if agents.is_empty() {
            let status = self.store.fail_run(question_id, "No agents available")?;
            self.notify(&status);
            return Err(AppError::Config("No agents available".to_string()));
        }

        info!(question_id, agents = agents.len(), "Processing question");

        let outcome = self.run_stages(question_id, &question.text, agents).await;
        match outcome {
            Ok(()) => {
                let status = self.store.finish_run(question_id)?;
                self.notify(&status);
                info!(question_id, "Completed processing question with all agents");
                Ok(status)
            }
            Err(AppError::NotFound(msg)) => {
                warn!(question_id, "Question deleted during run, stopping");
                Err(AppError::NotFound(msg))
            }
            Err(e) => {
                if let Ok(status) = self.store.fail_run(question_id, &e.to_string()) {
                    self.notify(&status);
                }
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        question_id: &str,
        question: &str,
        agents: &[Box<dyn Agent>],
    ) -> Result<()> {
        let mut progress = Progress {
            orchestrator: self,
            question_id,
            completed: 0,
        };

        // Stage 1: responses
        for agent in agents {
            info!(question_id, agent_id = agent.id(), stage = %Stage::Response, "Generating");
            let response = match agent.respond(question).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(question_id, agent_id = agent.id(), error = %e, "Response failed");
                    AgentResponse::failed(agent.name(), agent.model(), &e.to_string())
                }
            };
            self.store.record_response(question_id, agent.id(), response)?;
            progress.advance(Stage::Response)?;
        }

        // Stage 2: critiques of every other agent's response
        let responses = self
            .store
            .get_context(question_id)
            .map(|ctx| ctx.responses)
            .ok_or_else(|| AppError::NotFound(format!("Question {} not found", question_id)))?;

        for agent in agents {
            for target in agents.iter().filter(|t| t.id() != agent.id()) {
                let critique = match responses.get(target.id()) {
                    Some(response) => {
                        info!(question_id, agent_id = agent.id(), target = target.id(), stage = %Stage::Critique, "Generating");
                        match agent.critique(question, target.id(), response).await {
                            Ok(critique) => critique,
                            Err(e) => {
                                warn!(question_id, agent_id = agent.id(), target = target.id(), error = %e, "Critique failed");
                                Critique::failed(agent.name(), target.id(), agent.model(), &e.to_string())
                            }
                        }
                    }
                    None => Critique::failed(
                        agent.name(),
                        target.id(),
                        agent.model(),
                        "No response recorded",
                    ),
                };
                self.store.record_critique(question_id, agent.id(), critique)?;
                progress.advance(Stage::Critique)?;
            }
        }

        // Stage 3: research
        for agent in agents {
            info!(question_id, agent_id = agent.id(), stage = %Stage::Research, "Generating");
            let research = match agent.research(question).await {
                Ok(research) => research,
                Err(e) => {
                    warn!(question_id, agent_id = agent.id(), error = %e, "Research failed");
                    Research::failed(agent.name(), agent.model(), &e.to_string())
                }
            };
            self.store.record_research(question_id, agent.id(), research)?;
            progress.advance(Stage::Research)?;
        }

        // Stage 4: conclusions over a snapshot of the context
        let context = self
            .store
            .get_context(question_id)
            .ok_or_else(|| AppError::NotFound(format!("Question {} not found", question_id)))?;

        for agent in agents {
            info!(question_id, agent_id = agent.id(), stage = %Stage::Conclusion, "Generating");
            let conclusion = match agent.conclude(question, &context).await {
                Ok(conclusion) => conclusion,
                Err(e) => {
                    warn!(question_id, agent_id = agent.id(), error = %e, "Conclusion failed");
                    Conclusion::failed(agent.name(), agent.model(), &e.to_string())
                }
            };
            self.store.record_conclusion(question_id, agent.id(), conclusion)?;
            progress.advance(Stage::Conclusion)?;
        }

        Ok(())
    }
}
