//! Code review preset

use super::{Template, TemplateContext};
use crate::core::error::DomainError;
use crate::round::{RoundKind, RoundSpec};
use crate::session::{MAX_VOICES_LIMIT, MIN_VOICES_FLOOR, ParticipantSpec, SessionConfig};
use std::time::Duration;

pub const NAME: &str = "code_review";
pub const DESCRIPTION: &str =
    "Code review panel: a lead reviewer plus one specialist per requested focus area";

const DEFAULT_SUBJECT: &str = "the submitted change";
const DEFAULT_FOCUS_AREAS: [&str; 3] = ["correctness", "security", "maintainability"];
const REVIEWER_ROLE: &str = "code_reviewer";
const REVIEW_TEMPERATURE: f64 = 0.3;

/// Providers assigned to specialists in rotation
const SPECIALIST_PROVIDERS: [(&str, &str); 4] = [
    ("anthropic", "claude-3-5-sonnet"),
    ("google", "gemini-1.5-pro"),
    ("deepseek", "deepseek-coder"),
    ("mistral", "codestral"),
];

pub struct CodeReviewTemplate {
    subject: String,
    language: Option<String>,
    focus_areas: Vec<String>,
    provider_override: Option<String>,
}

pub fn build(context: &TemplateContext) -> Result<Box<dyn Template>, DomainError> {
    let mut focus_areas: Vec<String> = Vec::new();
    let requested = context.get_list("focus_areas");
    let requested = if requested.is_empty() {
        DEFAULT_FOCUS_AREAS.iter().map(|s| s.to_string()).collect()
    } else {
        requested
    };
    for area in requested {
        let area = area.to_lowercase();
        if !focus_areas.contains(&area) {
            focus_areas.push(area);
        }
    }

    // One seat is always taken by the lead reviewer
    if focus_areas.len() > MAX_VOICES_LIMIT - 1 {
        return Err(DomainError::InvalidTemplateContext {
            template: NAME.to_string(),
            reason: format!(
                "at most {} focus areas are supported, got {}",
                MAX_VOICES_LIMIT - 1,
                focus_areas.len()
            ),
        });
    }

    Ok(Box::new(CodeReviewTemplate {
        subject: context
            .get_str("topic")
            .or_else(|| context.get_str("code"))
            .unwrap_or(DEFAULT_SUBJECT)
            .to_string(),
        language: context.get_str("language").map(str::to_string),
        focus_areas,
        provider_override: context
            .get_str(super::PROVIDER_OVERRIDE_KEY)
            .map(str::to_string),
    }))
}

impl CodeReviewTemplate {
    fn provider<'a>(&'a self, default: &'a str) -> &'a str {
        self.provider_override.as_deref().unwrap_or(default)
    }

    fn subject_line(&self) -> String {
        match &self.language {
            Some(language) => format!("{} ({language})", self.subject),
            None => self.subject.clone(),
        }
    }
}

impl Template for CodeReviewTemplate {
    fn name(&self) -> &str {
        NAME
    }

    fn get_config(&self) -> SessionConfig {
        let voices = self.focus_areas.len() + 1;
        SessionConfig::new(
            format!("Code Review: {}", self.subject_line()),
            format!(
                "Review {} for {}",
                self.subject_line(),
                self.focus_areas.join(", ")
            ),
        )
        .with_voice_range(MIN_VOICES_FLOOR, voices.clamp(MIN_VOICES_FLOOR, MAX_VOICES_LIMIT))
    }

    fn get_voices(&self) -> Vec<ParticipantSpec> {
        let mut voices = vec![
            ParticipantSpec::new(self.provider("openai"), "gpt-4o")
                .with_role(REVIEWER_ROLE)
                .with_instructions(
                    "Lead the review: judge overall correctness, readability and whether the change should merge.",
                )
                .with_quality("thorough")
                .with_temperature(REVIEW_TEMPERATURE)
                .with_expertise(["code review"]),
        ];

        for (i, area) in self.focus_areas.iter().enumerate() {
            let (provider, model) = SPECIALIST_PROVIDERS[i % SPECIALIST_PROVIDERS.len()];
            voices.push(
                ParticipantSpec::new(self.provider(provider), model)
                    .with_role(format!("{area}_reviewer"))
                    .with_instructions(format!(
                        "Review strictly through the lens of {area}. Cite concrete lines or constructs."
                    ))
                    .with_temperature(REVIEW_TEMPERATURE)
                    .with_expertise([area.clone()]),
            );
        }

        voices
    }

    fn get_rounds(&self) -> Vec<RoundSpec> {
        let subject = self.subject_line();
        vec![
            RoundSpec::new(
                RoundKind::Review,
                format!("Review {subject}. List findings with severity (blocker, major, minor)."),
            )
            .with_duration(Duration::from_secs(120)),
            RoundSpec::new(
                RoundKind::Critique,
                "Challenge findings from other reviewers you believe are wrong or overstated.",
            ),
            RoundSpec::new(
                RoundKind::Synthesis,
                "Merge the findings into one prioritized list of required changes.",
            ),
            RoundSpec::new(
                RoundKind::Consensus,
                format!("Should {subject} be approved, approved with changes, or rejected?"),
            )
            .with_temperature(0.2),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn has_reviewer(template: &dyn Template) -> bool {
        template
            .get_voices()
            .iter()
            .any(|v| v.role.as_deref() == Some(REVIEWER_ROLE))
    }

    #[test]
    fn test_reviewer_present_with_default_focus() {
        let template = build(&TemplateContext::new()).unwrap();
        assert!(has_reviewer(template.as_ref()));
        assert_eq!(template.get_voices().len(), DEFAULT_FOCUS_AREAS.len() + 1);
    }

    #[test]
    fn test_reviewer_present_regardless_of_focus() {
        let ctx = TemplateContext::new().with("focus_areas", json!(["performance"]));
        let template = build(&ctx).unwrap();
        assert!(has_reviewer(template.as_ref()));
        let roles: Vec<_> = template
            .get_voices()
            .into_iter()
            .filter_map(|v| v.role)
            .collect();
        assert_eq!(roles, vec!["code_reviewer", "performance_reviewer"]);
        assert!(template.get_config().validate().is_ok());
    }

    #[test]
    fn test_duplicate_focus_areas_collapsed() {
        let ctx = TemplateContext::new().with("focus_areas", "Security, security, testing");
        let template = build(&ctx).unwrap();
        assert_eq!(template.get_voices().len(), 3);
    }

    #[test]
    fn test_too_many_focus_areas_rejected() {
        let areas: Vec<String> = (0..MAX_VOICES_LIMIT).map(|i| format!("area{i}")).collect();
        let ctx = TemplateContext::new().with("focus_areas", json!(areas));
        assert!(matches!(
            build(&ctx),
            Err(DomainError::InvalidTemplateContext { .. })
        ));
    }

    #[test]
    fn test_language_in_prompts() {
        let ctx = TemplateContext::new()
            .with("topic", "the parser rewrite")
            .with("language", "Rust");
        let template = build(&ctx).unwrap();
        assert!(template.get_rounds()[0].prompt.contains("the parser rewrite (Rust)"));
    }
}
