//! Ethics review preset

use super::{Template, TemplateContext};
use crate::core::error::DomainError;
use crate::round::{RoundKind, RoundSpec};
use crate::session::{FailureStrategy, ParticipantSpec, SessionConfig};
use std::time::Duration;

pub const NAME: &str = "ethics_review";
pub const DESCRIPTION: &str =
    "Ethics board review with strict failure handling and long deliberation budgets";

const DEFAULT_TOPIC: &str = "the proposed initiative";

/// Ethics voices get more time than the default per-voice budget
const DELIBERATION_BUDGET: Duration = Duration::from_secs(120);
const EXTENDED_BUDGET: Duration = Duration::from_secs(180);

pub struct EthicsReviewTemplate {
    topic: String,
    provider_override: Option<String>,
}

pub fn build(context: &TemplateContext) -> Result<Box<dyn Template>, DomainError> {
    Ok(Box::new(EthicsReviewTemplate {
        topic: context.str_or("topic", DEFAULT_TOPIC).to_string(),
        provider_override: context
            .get_str(super::PROVIDER_OVERRIDE_KEY)
            .map(str::to_string),
    }))
}

impl EthicsReviewTemplate {
    fn provider<'a>(&'a self, default: &'a str) -> &'a str {
        self.provider_override.as_deref().unwrap_or(default)
    }
}

impl Template for EthicsReviewTemplate {
    fn name(&self) -> &str {
        NAME
    }

    fn get_config(&self) -> SessionConfig {
        SessionConfig::new(
            format!("Ethics Review: {}", self.topic),
            format!("Assess the ethical implications of {}", self.topic),
        )
        .with_voice_range(3, 5)
        .with_failure_strategy(FailureStrategy::Strict)
        .with_transcript(true)
    }

    fn get_voices(&self) -> Vec<ParticipantSpec> {
        vec![
            ParticipantSpec::new(self.provider("anthropic"), "claude-3-5-sonnet")
                .with_role("ethicist")
                .with_instructions("Apply consequentialist, deontological and virtue lenses.")
                .with_expertise(["ethics", "moral philosophy"]),
            ParticipantSpec::new(self.provider("openai"), "gpt-4o")
                .with_role("legal_scholar")
                .with_instructions("Identify legal exposure, rights and regulatory duties.")
                .with_expertise(["law", "regulation"]),
            ParticipantSpec::new(self.provider("google"), "gemini-1.5-pro")
                .with_role("affected_community")
                .with_instructions("Represent those who bear the consequences.")
                .with_expertise(["community impact"]),
            ParticipantSpec::new(self.provider("mistral"), "mistral-large")
                .with_role("technologist")
                .with_instructions("Explain what is technically possible and what is not.")
                .with_expertise(["technology", "safety"]),
        ]
    }

    fn get_rounds(&self) -> Vec<RoundSpec> {
        let topic = &self.topic;
        vec![
            RoundSpec::new(
                RoundKind::Opening,
                format!("What ethical questions does {topic} raise for you?"),
            )
            .with_duration(DELIBERATION_BUDGET),
            RoundSpec::new(
                RoundKind::Exploration,
                format!("Who is affected by {topic}, and how? Include those with no voice."),
            )
            .with_duration(EXTENDED_BUDGET),
            RoundSpec::new(
                RoundKind::Critique,
                "Test every argument so far for hidden harms and unstated assumptions.",
            )
            .with_duration(DELIBERATION_BUDGET),
            RoundSpec::new(
                RoundKind::Consensus,
                format!("Which safeguards would make {topic} acceptable, if any?"),
            )
            .with_duration(EXTENDED_BUDGET)
            .requiring_all_voices(),
            RoundSpec::new(
                RoundKind::Decision,
                format!("Give your final ethical verdict on {topic}."),
            )
            .with_duration(DELIBERATION_BUDGET)
            .requiring_all_voices(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::DEFAULT_DURATION_PER_VOICE;

    #[test]
    fn test_strict_and_long_budgets() {
        let template = build(&TemplateContext::new().with("topic", "facial recognition")).unwrap();
        assert_eq!(template.get_config().failure_strategy, FailureStrategy::Strict);
        assert!(
            template
                .get_rounds()
                .iter()
                .all(|r| r.duration_per_voice > DEFAULT_DURATION_PER_VOICE)
        );
    }

    #[test]
    fn test_topic_in_name() {
        let template = build(&TemplateContext::new().with("topic", "gene editing")).unwrap();
        assert!(template.get_config().name.contains("gene editing"));
    }
}
