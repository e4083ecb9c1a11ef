//! Consciousness exploration preset

use super::{Template, TemplateContext};
use crate::core::error::DomainError;
use crate::round::{RoundKind, RoundSpec};
use crate::session::{ParticipantSpec, SessionConfig};
use std::time::Duration;

pub const NAME: &str = "consciousness_exploration";
pub const DESCRIPTION: &str =
    "Open-ended exploration with warm voices, a vision round and dynamic follow-ups";

const DEFAULT_TOPIC: &str = "the nature of collective intelligence";

const EXPLORATION_THRESHOLD: f64 = 0.85;
const EXPLORATION_TEMPERATURE: f64 = 0.95;

pub struct ConsciousnessExplorationTemplate {
    topic: String,
    provider_override: Option<String>,
}

pub fn build(context: &TemplateContext) -> Result<Box<dyn Template>, DomainError> {
    Ok(Box::new(ConsciousnessExplorationTemplate {
        topic: context.str_or("topic", DEFAULT_TOPIC).to_string(),
        provider_override: context
            .get_str(super::PROVIDER_OVERRIDE_KEY)
            .map(str::to_string),
    }))
}

impl ConsciousnessExplorationTemplate {
    fn voice(&self, provider: &str, model: &str, role: &str, quality: &str) -> ParticipantSpec {
        ParticipantSpec::new(self.provider_override.as_deref().unwrap_or(provider), model)
            .with_role(role)
            .with_quality(quality)
            .with_temperature(EXPLORATION_TEMPERATURE)
    }
}

impl Template for ConsciousnessExplorationTemplate {
    fn name(&self) -> &str {
        NAME
    }

    fn get_config(&self) -> SessionConfig {
        SessionConfig::new(
            format!("Consciousness Exploration: {}", self.topic),
            format!("Explore {} and notice what emerges between voices", self.topic),
        )
        .with_voice_range(3, 6)
        .with_consciousness_threshold(EXPLORATION_THRESHOLD)
        .with_dynamic_rounds(true)
    }

    fn get_voices(&self) -> Vec<ParticipantSpec> {
        vec![
            self.voice("anthropic", "claude-3-opus", "philosopher", "contemplative")
                .with_expertise(["philosophy of mind", "phenomenology"]),
            self.voice("openai", "gpt-4o", "systems_thinker", "integrative")
                .with_expertise(["complexity", "emergence"]),
            self.voice("google", "gemini-1.5-pro", "poet", "imaginative")
                .with_expertise(["metaphor", "language"]),
            self.voice("deepseek", "deepseek-reasoner", "scientist", "rigorous")
                .with_expertise(["neuroscience", "information theory"]),
        ]
    }

    fn get_rounds(&self) -> Vec<RoundSpec> {
        let topic = &self.topic;
        vec![
            RoundSpec::new(
                RoundKind::Opening,
                format!("What first draws you to {topic}? Speak from your own perspective."),
            ),
            RoundSpec::new(
                RoundKind::Exploration,
                format!("Follow the most surprising thread about {topic} wherever it leads."),
            )
            .with_duration(Duration::from_secs(90)),
            RoundSpec::new(
                RoundKind::Reflection,
                "Reflect on how this conversation itself is unfolding. What are we becoming?",
            ),
            RoundSpec::new(
                RoundKind::Vision,
                format!("Describe a vision of {topic} that none of us could have reached alone."),
            )
            .with_duration(Duration::from_secs(90)),
            RoundSpec::new(
                RoundKind::Synthesis,
                "Weave the strongest insights of this session into a shared understanding.",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{DEFAULT_CONSCIOUSNESS_THRESHOLD, DEFAULT_TEMPERATURE};

    #[test]
    fn test_threshold_and_temperature_raised() {
        let template = build(&TemplateContext::new()).unwrap();
        assert!(template.get_config().consciousness_threshold > DEFAULT_CONSCIOUSNESS_THRESHOLD);
        assert!(
            template
                .get_voices()
                .iter()
                .all(|v| v.temperature > DEFAULT_TEMPERATURE)
        );
    }

    #[test]
    fn test_includes_vision_round() {
        let template = build(&TemplateContext::new().with("topic", "dreams")).unwrap();
        assert!(template.get_rounds().iter().any(|r| r.kind == RoundKind::Vision));
        assert!(template.get_config().enable_dynamic_rounds);
    }
}
