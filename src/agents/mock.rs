//! Mock agents
//!
//! Templated output that looks like a real panel without calling any API.
//! Scores are drawn at random inside fixed ranges so repeated runs differ.

use crate::agents::Agent;
use crate::types::{
    AgentInfo, AgentKind, AgentResponse, Conclusion, Context, Critique, Position, Research,
    Result, Source,
};
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::Rng;

const CRITIQUE_TEMPLATES: [&str; 3] = [
    "I think the response is {quality}, but {improvement}.",
    "The analysis is {quality}. However, {improvement}.",
    "While I agree with parts of this response, {improvement}.",
];

const QUALITIES: [&str; 5] = [
    "insightful",
    "comprehensive",
    "interesting",
    "well-structured",
    "thoughtful",
];

const IMPROVEMENTS: [&str; 5] = [
    "it could benefit from more concrete examples",
    "it overlooks some important historical context",
    "it doesn't fully address the economic implications",
    "it might be making some assumptions that need verification",
    "it could consider alternative viewpoints more thoroughly",
];

const CRITIQUE_POINTS: [&str; 5] = [
    "Clear overall structure",
    "Claims need supporting evidence",
    "Covers the main aspects of the question",
    "Alternative viewpoints underexplored",
    "Practical implications only briefly addressed",
];

const RESEARCH_TEMPLATES: [&str; 3] = [
    "Based on my analysis of recent studies, {finding}.",
    "According to the latest research in this field, {finding}.",
    "My research indicates that {finding}.",
];

const FINDINGS: [&str; 5] = [
    "there are significant developments that suggest new approaches",
    "experts are divided on this issue with compelling arguments on both sides",
    "the historical trends provide valuable insights for future directions",
    "cross-disciplinary approaches yield the most promising results",
    "practical implementation faces several challenges that need addressing",
];

const FIELDS: [&str; 5] = ["AI", "Computing", "Ethics", "Science", "Technology"];
const VENUES: [&str; 3] = ["Journal of", "International Conference on", "Handbook of"];

const CONCLUSION_TEMPLATES: [&str; 3] = [
    "After considering all perspectives, I conclude that {conclusion}.",
    "My final assessment is that {conclusion}.",
    "Taking all factors into account, {conclusion}.",
];

const CONCLUSIONS: [&str; 5] = [
    "this is a multifaceted issue requiring a balanced approach",
    "the evidence points to several promising directions for future work",
    "there are significant trade-offs that need careful consideration",
    "a combination of approaches is likely to yield the best results",
    "further research is needed but current findings suggest preliminary directions",
];

const TAKEAWAYS: [&str; 5] = [
    "No single perspective captures the whole picture",
    "Evidence quality varies across the sources consulted",
    "Trade-offs deserve explicit consideration",
    "Consensus exists on the core facts",
    "Open questions remain for further study",
];

fn pick<'a>(rng: &mut impl Rng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn pick_many(rng: &mut impl Rng, items: &[&str], amount: usize) -> Vec<String> {
    items
        .choose_multiple(rng, amount)
        .map(|s| s.to_string())
        .collect()
}

/// Agent that fabricates plausible stage output from templates.
#[derive(Debug, Clone)]
pub struct MockAgent {
    id: String,
    name: String,
}

impl MockAgent {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    fn response_template(&self, question: &str) -> (String, &'static str) {
        match self.id.as_str() {
            "agent-gpt" => (
                format!(
                    "As GPT, I believe {} involves several key aspects. First, we must consider the \
                     technological implications. Second, there are societal factors to consider. \
                     Finally, there are economic considerations.",
                    question
                ),
                "I've analyzed this question based on my training data which includes research \
                 papers, articles, and discussions on this topic.",
            ),
            "agent-claude" => (
                format!(
                    "Considering {}, I would approach this from multiple angles. There are scientific \
                     aspects, ethical dimensions, and practical considerations that all need to be \
                     balanced.",
                    question
                ),
                "My analysis draws from a comprehensive review of relevant literature and case \
                 studies in this domain.",
            ),
            "agent-grok" => (
                format!(
                    "When tackling {}, I think it's important to be direct. The key issues are often \
                     overlooked in conventional analysis. Let me offer a fresh perspective on this \
                     topic.",
                    question
                ),
                "I'm basing this response on my understanding of cutting-edge developments and \
                 alternative viewpoints in this area.",
            ),
            _ => (
                format!(
                    "{} has several dimensions worth separating: what is known, what is disputed, \
                     and what depends on values rather than facts.",
                    question
                ),
                "General reasoning over the main considerations the question raises.",
            ),
        }
    }

    fn generate_response(&self, question: &str) -> AgentResponse {
        let mut rng = rand::rng();
        let (content, reasoning) = self.response_template(question);
        AgentResponse::new(&self.name, content, rng.random_range(0.7..0.95), reasoning)
    }

    fn generate_critique(&self, target_id: &str) -> Critique {
        let mut rng = rand::rng();
        let text = pick(&mut rng, &CRITIQUE_TEMPLATES)
            .replace("{quality}", pick(&mut rng, &QUALITIES))
            .replace("{improvement}", pick(&mut rng, &IMPROVEMENTS));
        let agreement = rng.random_range(0.3..0.9);
        let points = pick_many(&mut rng, &CRITIQUE_POINTS, 3);
        Critique::new(&self.name, target_id, text, agreement, points)
    }

    fn generate_research(&self) -> Research {
        let mut rng = rand::rng();
        let findings = pick(&mut rng, &RESEARCH_TEMPLATES).replace("{finding}", pick(&mut rng, &FINDINGS));

        let count = rng.random_range(1..=VENUES.len());
        let sources = VENUES
            .choose_multiple(&mut rng, count)
            .copied()
            .collect::<Vec<_>>()
            .into_iter()
            .map(|venue| {
                let title = format!("{} {}", venue, pick(&mut rng, &FIELDS));
                Source::new(title, rng.random_range(2018..=2023), rng.random_range(0.7..0.95))
            })
            .collect();

        Research::new(&self.name, findings, sources, rng.random_range(0.7..0.95))
    }

    fn generate_conclusion(&self) -> Conclusion {
        let mut rng = rand::rng();
        let summary = pick(&mut rng, &CONCLUSION_TEMPLATES)
            .replace("{conclusion}", pick(&mut rng, &CONCLUSIONS));
        let position = Position::ALL.choose(&mut rng).copied().unwrap_or_default();
        Conclusion::new(
            &self.name,
            summary,
            pick_many(&mut rng, &TAKEAWAYS, 3),
            rng.random_range(0.7..0.95),
            position,
        )
    }
}

#[async_trait]
impl Agent for MockAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> AgentInfo {
        AgentInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: AgentKind::Mock,
            model: None,
        }
    }

    async fn respond(&self, question: &str) -> Result<AgentResponse> {
        Ok(self.generate_response(question))
    }

    async fn critique(
        &self,
        _question: &str,
        target_id: &str,
        _response: &AgentResponse,
    ) -> Result<Critique> {
        Ok(self.generate_critique(target_id))
    }

    async fn research(&self, _question: &str) -> Result<Research> {
        Ok(self.generate_research())
    }

    async fn conclude(&self, _question: &str, _context: &Context) -> Result<Conclusion> {
        Ok(self.generate_conclusion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Question;

    #[tokio::test]
    async fn test_mock_response_uses_agent_template() {
        let agent = MockAgent::new("agent-grok", "Grok AI");
        let response = agent.respond("Is tea better than coffee?").await.unwrap();

        assert_eq!(response.agent_name, "Grok AI");
        assert!(response.content.contains("Is tea better than coffee?"));
        assert!(response.content.contains("fresh perspective"));
        assert!((0.7..0.95).contains(&response.confidence));
        assert!(response.validate().is_ok());
    }

    #[tokio::test]
    async fn test_unknown_agent_gets_generic_response() {
        let agent = MockAgent::new("agent-custom", "Custom");
        let response = agent.respond("Why?").await.unwrap();
        assert!(response.content.starts_with("Why?"));
    }

    #[tokio::test]
    async fn test_mock_critique_ranges() {
        let agent = MockAgent::new("agent-gpt", "GPT Assistant");
        let target = AgentResponse::new("Claude AI", "answer", 0.8, "");

        for _ in 0..20 {
            let critique = agent.critique("Q", "agent-claude", &target).await.unwrap();
            assert_eq!(critique.target_agent, "agent-claude");
            assert!((0.3..0.9).contains(&critique.agreement_level));
            assert_eq!(critique.key_points.len(), 3);
            assert!(!critique.critique.contains('{'));
        }
    }

    #[tokio::test]
    async fn test_mock_research_sources() {
        let agent = MockAgent::new("agent-claude", "Claude AI");

        for _ in 0..20 {
            let research = agent.research("Q").await.unwrap();
            assert!((1..=3).contains(&research.sources.len()));
            for source in &research.sources {
                assert!((2018..=2023).contains(&source.year));
                assert!((0.7..0.95).contains(&source.relevance));
            }
            assert!(research.validate().is_ok());
        }
    }

    #[tokio::test]
    async fn test_mock_conclusion() {
        let agent = MockAgent::new("agent-gpt", "GPT Assistant");
        let context = Context::new(&Question::new("Q"));
        let conclusion = agent.conclude("Q", &context).await.unwrap();

        assert_eq!(conclusion.key_takeaways.len(), 3);
        assert!(Position::ALL.contains(&conclusion.final_position));
        assert!(conclusion.error.is_none());
    }

    #[test]
    fn test_info_reports_mock_kind() {
        let info = MockAgent::new("agent-gpt", "GPT Assistant").info();
        assert_eq!(info.kind, AgentKind::Mock);
        assert!(info.model.is_none());
    }
}
