use crate::agents::heuristics;
use crate::agents::persona::Persona;
use crate::agents::Agent;
use crate::llm::LLMClient;
use crate::types::{
    AgentInfo, AgentKind, AgentResponse, AppError, Conclusion, Context, Critique, Research,
    Result, Stage,
};
use crate::utils::toml_config::OrchestratorConfig;
use async_trait::async_trait;

/// Agent backed by a hosted model and shaped by a [`Persona`].
pub struct LlmAgent {
    id: String,
    name: String,
    persona: &'static Persona,
    client: Box<dyn LLMClient>,
    limits: OrchestratorConfig,
}

impl LlmAgent {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        persona: &'static Persona,
        client: Box<dyn LLMClient>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            persona,
            client,
            limits: OrchestratorConfig::default(),
        }
    }

    /// Override the per-stage token limits
    pub fn with_limits(mut self, limits: OrchestratorConfig) -> Self {
        self.limits = limits;
        self
    }

    async fn ask(&self, stage: Stage, prompt: &str) -> Result<String> {
        tracing::info!(agent_id = %self.id, stage = %stage, "Calling model");
        self.client
            .generate_with_limit(
                self.persona.system_prompt(stage),
                prompt,
                self.limits.max_tokens(stage),
            )
            .await
    }

    fn model_name(&self) -> &str {
        self.client.model_name()
    }
}

#[async_trait]
impl Agent for LlmAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> Option<&str> {
        Some(self.model_name())
    }

    fn info(&self) -> AgentInfo {
        AgentInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: AgentKind::Llm,
            model: Some(self.model_name().to_string()),
        }
    }

    async fn respond(&self, question: &str) -> Result<AgentResponse> {
        let content = self.ask(Stage::Response, question).await?;
        let confidence = self.persona.response_confidence.score(&content);

        Ok(
            AgentResponse::new(&self.name, content, confidence, self.persona.reasoning)
                .with_model(self.model_name()),
        )
    }

    async fn critique(
        &self,
        question: &str,
        target_id: &str,
        response: &AgentResponse,
    ) -> Result<Critique> {
        let author = if response.agent_name.is_empty() {
            target_id
        } else {
            response.agent_name.as_str()
        };
        let prompt = format!(
            "Original question: {}\n\nResponse from {}:\n{}\n\n\
             Please evaluate this response according to the criteria in your instructions.",
            question, author, response.content
        );

        let text = self.ask(Stage::Critique, &prompt).await?;
        let agreement = heuristics::agreement_level(&text, self.persona.default_agreement);
        let mut key_points = heuristics::key_points(&text);
        if key_points.is_empty() {
            key_points.push(format!("Point extracted from {}'s critique", self.name));
        }

        Ok(Critique::new(&self.name, target_id, text, agreement, key_points).with_model(self.model_name()))
    }

    async fn research(&self, question: &str) -> Result<Research> {
        let prompt = format!("Research question: {}", question);
        let findings = self.ask(Stage::Research, &prompt).await?;

        Ok(Research::new(
            &self.name,
            findings,
            self.persona.sources(),
            self.persona.research_confidence,
        )
        .with_model(self.model_name()))
    }

    async fn conclude(&self, question: &str, context: &Context) -> Result<Conclusion> {
        let context_json = serde_json::to_string_pretty(context)
            .map_err(|e| AppError::Internal(format!("Failed to serialize context: {}", e)))?;
        let prompt = format!(
            "Original question: {}\n\nContext (including responses, critiques, and research):\n{}\n\n\
             Please form a conclusion based on all available information.",
            question, context_json
        );

        let summary = self.ask(Stage::Conclusion, &prompt).await?;
        let position = heuristics::final_position(&summary, self.persona.default_position);
        let mut takeaways = heuristics::key_points(&summary);
        if takeaways.is_empty() {
            takeaways = self.persona.takeaways();
        }

        Ok(Conclusion::new(
            &self.name,
            summary,
            takeaways,
            self.persona.conclusion_confidence,
            position,
        )
        .with_model(self.model_name()))
    }
}
