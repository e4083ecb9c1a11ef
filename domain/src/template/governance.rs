//! Governance decision preset

use super::{Template, TemplateContext};
use crate::core::error::DomainError;
use crate::round::{RoundKind, RoundSpec};
use crate::session::{FailureStrategy, ParticipantSpec, SessionConfig};
use std::time::Duration;

pub const NAME: &str = "governance_decision";
pub const DESCRIPTION: &str =
    "Multi-stakeholder governance deliberation ending in a formal decision round";

const DEFAULT_TOPIC: &str = "the proposal under consideration";

/// Quorum for governance sessions
const GOVERNANCE_QUORUM: usize = 4;

pub struct GovernanceDecisionTemplate {
    topic: String,
    provider_override: Option<String>,
}

pub fn build(context: &TemplateContext) -> Result<Box<dyn Template>, DomainError> {
    Ok(Box::new(GovernanceDecisionTemplate {
        topic: context.str_or("topic", DEFAULT_TOPIC).to_string(),
        provider_override: context
            .get_str(super::PROVIDER_OVERRIDE_KEY)
            .map(str::to_string),
    }))
}

impl GovernanceDecisionTemplate {
    fn provider<'a>(&'a self, default: &'a str) -> &'a str {
        self.provider_override.as_deref().unwrap_or(default)
    }
}

impl Template for GovernanceDecisionTemplate {
    fn name(&self) -> &str {
        NAME
    }

    fn get_config(&self) -> SessionConfig {
        SessionConfig::new(
            format!("Governance Decision: {}", self.topic),
            format!(
                "Reach a legitimate, well-reasoned collective decision on {}",
                self.topic
            ),
        )
        .with_voice_range(GOVERNANCE_QUORUM, 7)
        .with_failure_strategy(FailureStrategy::Adaptive)
        .with_transcript(true)
    }

    fn get_voices(&self) -> Vec<ParticipantSpec> {
        vec![
            ParticipantSpec::new(self.provider("anthropic"), "claude-3-5-sonnet")
                .with_role("constitutional_scholar")
                .with_instructions("Weigh the decision against principles, precedent and legitimacy.")
                .with_quality("principled")
                .with_expertise(["governance", "law"]),
            ParticipantSpec::new(self.provider("openai"), "gpt-4o")
                .with_role("economist")
                .with_instructions("Assess costs, incentives and second-order effects.")
                .with_quality("analytical")
                .with_expertise(["economics", "incentives"]),
            ParticipantSpec::new(self.provider("google"), "gemini-1.5-pro")
                .with_role("community_advocate")
                .with_instructions("Speak for the people affected who are not in the room.")
                .with_quality("empathetic")
                .with_expertise(["community", "equity"]),
            ParticipantSpec::new(self.provider("deepseek"), "deepseek-chat")
                .with_role("systems_engineer")
                .with_instructions("Focus on feasibility, implementation and operations.")
                .with_quality("pragmatic")
                .with_expertise(["implementation", "operations"]),
            ParticipantSpec::new(self.provider("mistral"), "mistral-large")
                .with_role("risk_analyst")
                .with_instructions("Identify failure modes and how to mitigate them.")
                .with_quality("cautious")
                .with_expertise(["risk", "security"]),
        ]
    }

    fn get_rounds(&self) -> Vec<RoundSpec> {
        let topic = &self.topic;
        vec![
            RoundSpec::new(
                RoundKind::Opening,
                format!("State your initial position on {topic} and the values behind it."),
            ),
            RoundSpec::new(
                RoundKind::Exploration,
                format!("Explore the options and trade-offs available for {topic}."),
            )
            .with_duration(Duration::from_secs(90)),
            RoundSpec::new(
                RoundKind::Critique,
                "Challenge the weakest assumptions raised so far, including your own.",
            ),
            RoundSpec::new(
                RoundKind::Consensus,
                format!("Where do we agree on {topic}? Name remaining objections explicitly."),
            )
            .with_temperature(0.5),
            RoundSpec::new(
                RoundKind::Decision,
                format!("Cast your final recommendation on {topic} with conditions, if any."),
            )
            .with_temperature(0.3),
        ]
    }
}
