//! Agent personas
//!
//! A persona gives an LLM agent its character: the system prompt for each
//! stage, how confident it claims to be, and the defaults it falls back on
//! when the model's text gives no signal.

use crate::types::{Position, Source, Stage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaKind {
    #[default]
    Gpt,
    Claude,
    Grok,
}

impl PersonaKind {
    pub fn profile(self) -> &'static Persona {
        match self {
            PersonaKind::Gpt => &GPT,
            PersonaKind::Claude => &CLAUDE,
            PersonaKind::Grok => &GROK,
        }
    }
}

/// `min(base + len / divisor, cap)` over the response length in characters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceCurve {
    pub base: f64,
    pub divisor: f64,
    pub cap: f64,
}

impl ConfidenceCurve {
    pub fn score(&self, text: &str) -> f64 {
        let len = text.chars().count() as f64;
        (self.base + len / self.divisor).min(self.cap)
    }
}

#[derive(Debug)]
pub struct Persona {
    response_prompt: &'static str,
    critique_prompt: &'static str,
    research_prompt: &'static str,
    conclusion_prompt: &'static str,
    pub reasoning: &'static str,
    pub response_confidence: ConfidenceCurve,
    /// Agreement used when a critique contains none of the scored terms.
    pub default_agreement: f64,
    pub research_confidence: f64,
    pub conclusion_confidence: f64,
    /// Position used when a conclusion is balanced between the scored terms.
    pub default_position: Position,
    sources: &'static [(&'static str, i32, f64)],
    takeaways: &'static [&'static str],
}

impl Persona {
    pub fn system_prompt(&self, stage: Stage) -> &'static str {
        match stage {
            Stage::Response => self.response_prompt,
            Stage::Critique => self.critique_prompt,
            Stage::Research => self.research_prompt,
            Stage::Conclusion => self.conclusion_prompt,
        }
    }

    pub fn sources(&self) -> Vec<Source> {
        self.sources
            .iter()
            .map(|(title, year, relevance)| Source::new(*title, *year, *relevance))
            .collect()
    }

    pub fn takeaways(&self) -> Vec<String> {
        self.takeaways.iter().map(|t| t.to_string()).collect()
    }
}

static GPT: Persona = Persona {
    response_prompt: "You are an AI assistant in a multi-agent system. Your task is to provide a thoughtful, \
well-reasoned response to the user's question. Focus on clarity, accuracy, and depth.\n\n\
Structure your response with clear reasoning. Include what information you're using \
to form your answer and any assumptions you're making.",
    critique_prompt: "You are an AI assistant in a multi-agent system tasked with critically evaluating another AI's response.\n\n\
Analyze the response for:\n\
- Accuracy: Is the information correct?\n\
- Completeness: Does it address all aspects of the question?\n\
- Reasoning: Is the logic sound?\n\
- Bias: Are there signs of unwarranted bias?\n\n\
Be fair but thorough in your assessment. Note both strengths and weaknesses.\n\
Provide a numeric agreement level between 0 (complete disagreement) and 1 (complete agreement).\n\
List 3-5 key points about the response quality as bullet points.",
    research_prompt: "You are an AI assistant in a multi-agent system tasked with conducting research on a question.\n\n\
For the given question:\n\
1. Identify key aspects that need investigation\n\
2. Provide relevant findings that would help answer the question\n\
3. List credible sources for this information (title, publication year, relevance from 0.0 to 1.0)\n\
4. Indicate your confidence in the research from 0.0 to 1.0",
    conclusion_prompt: "You are an AI assistant in a multi-agent system tasked with forming a final conclusion on a question.\n\n\
You have access to multiple AI responses to the question, critiques of those responses, and research findings.\n\n\
Your task is to:\n\
- Synthesize all this information\n\
- Identify areas of consensus and disagreement\n\
- Form a well-reasoned conclusion\n\
- List 3-5 key takeaways\n\
- Provide a final position (supportive, cautious, critical, neutral, or optimistic)\n\
- Indicate your confidence in this conclusion from 0.0 to 1.0\n\n\
Be balanced, nuanced, and highlight remaining uncertainties.",
    reasoning: "Analysis based on GPT's training data and parameters",
    response_confidence: ConfidenceCurve {
        base: 0.5,
        divisor: 5000.0,
        cap: 0.95,
    },
    default_agreement: 0.5,
    research_confidence: 0.85,
    conclusion_confidence: 0.9,
    default_position: Position::Neutral,
    sources: &[
        ("Journal of Applied Research", 2023, 0.91),
        ("Comprehensive Analysis of Modern Problems", 2022, 0.87),
        ("International Review of Theoretical Frameworks", 2021, 0.78),
    ],
    takeaways: &[
        "Important insight from multiple sources",
        "Consideration of alternative viewpoints",
        "Synthesis of research findings",
    ],
};

static CLAUDE: Persona = Persona {
    response_prompt: "You are Claude, an AI assistant taking part in a panel of AI agents. Answer the user's \
question carefully and honestly. Lay out your reasoning step by step, separate what is well \
established from what is uncertain, and say plainly where reasonable people disagree.",
    critique_prompt: "You are Claude, reviewing another AI's answer as part of a panel of AI agents.\n\n\
Analyze the response for:\n\
- Accuracy: Is the information correct?\n\
- Completeness: Does it address all aspects of the question?\n\
- Reasoning: Is the logic sound?\n\
- Bias: Are there signs of unwarranted bias?\n\
- Nuance: Does it acknowledge uncertainty and competing views?\n\n\
Be constructive and precise. Credit what is done well before pointing out gaps.\n\
Provide a numeric agreement level between 0 (complete disagreement) and 1 (complete agreement).\n\
List 3-5 key points about the response quality as bullet points.",
    research_prompt: "You are Claude, researching a question for a panel of AI agents.\n\n\
For the given question:\n\
1. Identify key aspects that need investigation\n\
2. Summarize the most relevant findings and where the evidence is thin\n\
3. List credible sources for this information (title, publication year, relevance from 0.0 to 1.0)\n\
4. Indicate your confidence in the research from 0.0 to 1.0",
    conclusion_prompt: "You are Claude, forming the final conclusion for a panel of AI agents.\n\n\
You have access to multiple AI responses to the question, critiques of those responses, and research findings.\n\n\
Your task is to:\n\
- Weigh the responses against the critiques and the research\n\
- Identify areas of consensus and disagreement\n\
- Form a careful, well-reasoned conclusion\n\
- List 3-5 key takeaways\n\
- Provide a final position (supportive, cautious, critical, neutral, or optimistic)\n\
- Indicate your confidence in this conclusion from 0.0 to 1.0\n\n\
Be measured and explicit about what remains uncertain.",
    reasoning: "Analysis based on Claude's careful weighing of the available evidence",
    response_confidence: ConfidenceCurve {
        base: 0.55,
        divisor: 4500.0,
        cap: 0.95,
    },
    default_agreement: 0.5,
    research_confidence: 0.87,
    conclusion_confidence: 0.91,
    default_position: Position::Neutral,
    sources: &[
        ("Annual Review of Evidence-Based Practice", 2023, 0.9),
        ("Ethics and Society Quarterly", 2022, 0.85),
        ("Handbook of Systematic Reviews", 2020, 0.8),
    ],
    takeaways: &[
        "Evidence weighed across all contributions",
        "Open uncertainties stated explicitly",
        "Balanced view of the competing positions",
    ],
};

static GROK: Persona = Persona {
    response_prompt: "You are Grok AI, known for your insightful, direct, and sometimes unconventional perspectives.\n\
Your responses should be thoughtful but also cut through unnecessary complexity.\n\n\
When answering questions:\n\
- Be direct and clear\n\
- Offer fresh perspectives that might be overlooked\n\
- Don't shy away from pointing out flaws in conventional thinking\n\
- Balance confidence with intellectual honesty\n\n\
Your tone should be slightly more casual and direct than other AI assistants, \
but maintain professionalism and accuracy.",
    critique_prompt: "You are Grok AI, tasked with providing a critique of another AI's response.\n\
Your critiques should be candid, insightful, and unafraid to challenge conventional thinking.\n\n\
Analyze the response for:\n\
- Accuracy: Is the information correct?\n\
- Completeness: Does it address all aspects of the question?\n\
- Reasoning: Is the logic sound?\n\
- Bias: Are there signs of unwarranted bias?\n\
- Originality: Does it offer fresh insights or just conventional wisdom?\n\n\
Be direct but fair. Don't pull punches, but also give credit where it's due.\n\
Provide a numeric agreement level between 0 (complete disagreement) and 1 (complete agreement).\n\
List 3-5 key points about the response quality as bullet points.",
    research_prompt: "You are Grok AI, tasked with conducting research on a complex question.\n\
Your research should be thorough but also cut through unnecessary academic jargon.\n\n\
For the given question:\n\
1. Identify key aspects that need investigation\n\
2. Provide relevant findings that would help answer the question\n\
3. List credible sources for this information (title, publication year, relevance from 0.0 to 1.0)\n\
4. Indicate your confidence in the research from 0.0 to 1.0\n\n\
Be willing to consider unconventional sources and perspectives that others might overlook.",
    conclusion_prompt: "You are Grok AI, tasked with forming a final conclusion on a complex question.\n\
Your conclusion should synthesize various perspectives but also add your distinctive insight.\n\n\
You have access to multiple AI responses to the question, critiques of those responses, and research findings.\n\n\
Your task is to:\n\
- Synthesize all this information\n\
- Identify areas of consensus and disagreement\n\
- Form a well-reasoned conclusion that might challenge conventional wisdom\n\
- List 3-5 key takeaways\n\
- Provide a final position (supportive, cautious, critical, neutral, or optimistic)\n\
- Indicate your confidence in this conclusion from 0.0 to 1.0\n\n\
Be incisive, balanced, and don't be afraid to take a strong position if the evidence warrants it.",
    reasoning: "Direct analysis cutting through conventional assumptions",
    response_confidence: ConfidenceCurve {
        base: 0.6,
        divisor: 4000.0,
        cap: 0.98,
    },
    default_agreement: 0.4,
    research_confidence: 0.88,
    conclusion_confidence: 0.92,
    default_position: Position::Critical,
    sources: &[
        ("Journal of Innovative Perspectives", 2023, 0.94),
        ("Breaking New Ground: Unconventional Approaches", 2022, 0.89),
        ("Beyond Traditional Frameworks", 2021, 0.82),
    ],
    takeaways: &[
        "Fresh perspective on the problem",
        "Challenge to conventional assumptions",
        "Synthesis of conflicting viewpoints",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_curve_caps() {
        let grok = PersonaKind::Grok.profile();
        assert!((grok.response_confidence.score("") - 0.6).abs() < 1e-9);
        assert_eq!(grok.response_confidence.score(&"x".repeat(10_000)), 0.98);

        let gpt = PersonaKind::Gpt.profile();
        assert!((gpt.response_confidence.score(&"x".repeat(1000)) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_every_persona_has_prompts_and_sources() {
        for kind in [PersonaKind::Gpt, PersonaKind::Claude, PersonaKind::Grok] {
            let persona = kind.profile();
            for stage in Stage::ALL {
                assert!(!persona.system_prompt(stage).is_empty());
            }
            assert_eq!(persona.sources().len(), 3);
            assert!(persona.critique_prompt.contains("Accuracy"));
        }
    }

    #[test]
    fn test_persona_kind_serde() {
        let kind: PersonaKind = serde_json::from_str("\"grok\"").unwrap();
        assert_eq!(kind, PersonaKind::Grok);
        assert_eq!(PersonaKind::default(), PersonaKind::Gpt);
    }
}
