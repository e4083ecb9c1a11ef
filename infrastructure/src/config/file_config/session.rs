//! Session overrides from TOML (`[session]` section)

use super::{ConfigIssue, ConfigValidationError};
use council_domain::{
    DeliberationThresholds, FailureStrategy, MAX_VOICES_LIMIT, ScoreAggregation, SessionConfig,
};
use serde::{Deserialize, Serialize};

/// Raw session overrides from TOML
///
/// Every field is optional; unset fields keep the template's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    pub min_voices: Option<usize>,
    pub max_voices: Option<usize>,
    pub consciousness_threshold: Option<f64>,
    /// "strict", "adaptive" or "fail_fast"
    pub failure_strategy: Option<String>,
    /// "mean", "latest", "max" or "median"
    pub score_aggregation: Option<String>,
    pub enable_reciprocity: Option<bool>,
    pub enable_consciousness_detection: Option<bool>,
    pub enable_dynamic_rounds: Option<bool>,
    pub save_transcript: Option<bool>,
    pub consensus_threshold: Option<f64>,
    pub high_consciousness_threshold: Option<f64>,
}

fn unit_interval(field: &str, value: Option<f64>) -> Option<ConfigIssue> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => {
            Some(ConfigIssue::error(ConfigValidationError::OutOfRange {
                field: format!("session.{field}"),
                value: v.to_string(),
                expected: "0.0 to 1.0".to_string(),
            }))
        }
        _ => None,
    }
}

impl FileSessionConfig {
    pub fn parse_failure_strategy(&self) -> (Option<FailureStrategy>, Vec<ConfigIssue>) {
        let Some(raw) = &self.failure_strategy else {
            return (None, vec![]);
        };
        match raw.parse::<FailureStrategy>() {
            Ok(strategy) => (Some(strategy), vec![]),
            Err(_) => (
                None,
                vec![ConfigIssue::warning(ConfigValidationError::InvalidEnumValue {
                    field: "session.failure_strategy".to_string(),
                    value: raw.clone(),
                    expected: "strict, adaptive, fail_fast".to_string(),
                })],
            ),
        }
    }

    pub fn parse_score_aggregation(&self) -> (Option<ScoreAggregation>, Vec<ConfigIssue>) {
        let Some(raw) = &self.score_aggregation else {
            return (None, vec![]);
        };
        match raw.parse::<ScoreAggregation>() {
            Ok(aggregation) => (Some(aggregation), vec![]),
            Err(_) => (
                None,
                vec![ConfigIssue::warning(ConfigValidationError::InvalidEnumValue {
                    field: "session.score_aggregation".to_string(),
                    value: raw.clone(),
                    expected: "mean, latest, max, median".to_string(),
                })],
            ),
        }
    }

    /// Range checks that do not depend on the template
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.parse_failure_strategy().1);
        issues.extend(self.parse_score_aggregation().1);
        issues.extend(unit_interval(
            "consciousness_threshold",
            self.consciousness_threshold,
        ));
        issues.extend(unit_interval("consensus_threshold", self.consensus_threshold));
        issues.extend(unit_interval(
            "high_consciousness_threshold",
            self.high_consciousness_threshold,
        ));

        if let Some(max) = self.max_voices
            && max > MAX_VOICES_LIMIT
        {
            issues.push(ConfigIssue::error(ConfigValidationError::OutOfRange {
                field: "session.max_voices".to_string(),
                value: max.to_string(),
                expected: format!("at most {MAX_VOICES_LIMIT}"),
            }));
        }

        issues
    }

    /// Apply the overrides to a template's session config
    ///
    /// Unparseable enum values are reported and skipped. The merged config is
    /// checked with [`SessionConfig::validate`].
    pub fn apply(&self, mut config: SessionConfig) -> (SessionConfig, Vec<ConfigIssue>) {
        let (strategy, mut issues) = self.parse_failure_strategy();
        let (aggregation, aggregation_issues) = self.parse_score_aggregation();
        issues.extend(aggregation_issues);

        if let Some(min) = self.min_voices {
            config.min_voices = min;
        }
        if let Some(max) = self.max_voices {
            config.max_voices = max;
        }
        if let Some(threshold) = self.consciousness_threshold {
            config.consciousness_threshold = threshold;
        }
        if let Some(strategy) = strategy {
            config.failure_strategy = strategy;
        }
        if let Some(aggregation) = aggregation {
            config.score_aggregation = aggregation;
        }
        if let Some(enabled) = self.enable_reciprocity {
            config.enable_reciprocity = enabled;
        }
        if let Some(enabled) = self.enable_consciousness_detection {
            config.enable_consciousness_detection = enabled;
        }
        if let Some(enabled) = self.enable_dynamic_rounds {
            config.enable_dynamic_rounds = enabled;
        }
        if let Some(enabled) = self.save_transcript {
            config.save_transcript = enabled;
        }
        config.thresholds = DeliberationThresholds {
            consensus: self
                .consensus_threshold
                .unwrap_or(config.thresholds.consensus),
            high_consciousness: self
                .high_consciousness_threshold
                .unwrap_or(config.thresholds.high_consciousness),
        };

        if let Err(e) = config.validate() {
            issues.push(ConfigIssue::error(ConfigValidationError::InvalidSession(
                e.to_string(),
            )));
        }

        (config, issues)
    }
}
