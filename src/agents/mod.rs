//! Agents taking part in a question's pipeline.
//!
//! Every agent answers the same four calls, one per [`Stage`](crate::types::Stage).
//! [`MockAgent`] produces templated output for demos and tests, while
//! [`LlmAgent`] sends persona prompts to a hosted model.

pub mod heuristics;
pub mod llm_agent;
pub mod mock;
pub mod persona;
pub mod registry;

use crate::types::{AgentInfo, AgentResponse, Conclusion, Context, Critique, Research, Result};
use async_trait::async_trait;

pub use llm_agent::LlmAgent;
pub use mock::MockAgent;
pub use persona::{Persona, PersonaKind};
pub use registry::AgentRegistry;

/// Base trait for all agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Stable id used as the key in a question's context
    fn id(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;

    fn info(&self) -> AgentInfo;

    /// Hosted model behind the agent, if any
    fn model(&self) -> Option<&str> {
        None
    }

    /// Answer the question
    async fn respond(&self, question: &str) -> Result<AgentResponse>;

    /// Review another agent's answer
    async fn critique(
        &self,
        question: &str,
        target_id: &str,
        response: &AgentResponse,
    ) -> Result<Critique>;

    async fn research(&self, question: &str) -> Result<Research>;

    /// Form a final position from everything gathered so far
    async fn conclude(&self, question: &str, context: &Context) -> Result<Conclusion>;
}
