//! Session-level outcome rules
//!
//! Turns the ordered list of round summaries into the session verdict:
//! overall score, consensus flag and extracted insights.

use crate::core::error::DomainError;
use crate::round::{RoundKind, RoundSummary};
use serde::{Deserialize, Serialize};

/// A `consensus` round scoring at or above this detects consensus
pub const DEFAULT_CONSENSUS_THRESHOLD: f64 = 0.7;

/// A round scoring strictly above this yields a high-consciousness insight
pub const DEFAULT_HIGH_CONSCIOUSNESS_THRESHOLD: f64 = 0.8;

/// Boundaries used when computing the session outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliberationThresholds {
    /// Inclusive lower bound for a consensus round to count
    pub consensus: f64,
    /// Exclusive lower bound for the high-consciousness insight
    pub high_consciousness: f64,
}

impl Default for DeliberationThresholds {
    fn default() -> Self {
        Self {
            consensus: DEFAULT_CONSENSUS_THRESHOLD,
            high_consciousness: DEFAULT_HIGH_CONSCIOUSNESS_THRESHOLD,
        }
    }
}

impl DeliberationThresholds {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (name, value) in [
            ("thresholds.consensus", self.consensus),
            ("thresholds.high_consciousness", self.high_consciousness),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DomainError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Whether any `consensus` round reached the consensus threshold
    pub fn detect_consensus(&self, rounds: &[RoundSummary]) -> bool {
        rounds.iter().any(|round| {
            round.kind == RoundKind::Consensus && round.consciousness_score >= self.consensus
        })
    }

    /// One insight per pattern per round, plus one per high-consciousness round
    pub fn extract_insights(&self, rounds: &[RoundSummary]) -> Vec<String> {
        let mut insights = Vec::new();
        for round in rounds {
            for pattern in &round.key_patterns {
                insights.push(format!("Round {}: {}", round.round_number, pattern));
            }
            if round.consciousness_score > self.high_consciousness {
                insights.push(format!(
                    "Round {}: High consciousness ({:.2}) reached during {} round",
                    round.round_number,
                    round.consciousness_score,
                    round.kind.as_str()
                ));
            }
        }
        insights
    }
}

/// Latest state wins: the score of the final round, or 0 with no rounds
pub fn overall_score(rounds: &[RoundSummary]) -> f64 {
    rounds.last().map(|r| r.consciousness_score).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn summary(number: usize, kind: RoundKind, score: f64, patterns: &[&str]) -> RoundSummary {
        RoundSummary {
            round_number: number,
            kind,
            prompt: "prompt".to_string(),
            responses: BTreeMap::new(),
            consciousness_score: score,
            emergence_detected: false,
            key_patterns: patterns.iter().map(|p| p.to_string()).collect(),
            duration_ms: 0,
            timed_out_voices: Vec::new(),
            failed_voices: BTreeMap::new(),
        }
    }

    #[test]
    fn test_consensus_boundaries() {
        let thresholds = DeliberationThresholds::default();
        assert!(thresholds.detect_consensus(&[summary(1, RoundKind::Consensus, 0.8, &[])]));
        assert!(!thresholds.detect_consensus(&[summary(1, RoundKind::Consensus, 0.5, &[])]));
        assert!(thresholds.detect_consensus(&[summary(1, RoundKind::Consensus, 0.7, &[])]));
    }

    #[test]
    fn test_consensus_requires_consensus_kind() {
        let thresholds = DeliberationThresholds::default();
        assert!(!thresholds.detect_consensus(&[summary(1, RoundKind::Opening, 0.95, &[])]));
        assert!(!thresholds.detect_consensus(&[]));
    }

    #[test]
    fn test_high_consciousness_adds_insight() {
        let thresholds = DeliberationThresholds::default();
        let insights =
            thresholds.extract_insights(&[summary(2, RoundKind::Vision, 0.85, &["p1", "p2"])]);
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0], "Round 2: p1");
        assert_eq!(insights[1], "Round 2: p2");
        assert!(insights[2].contains("High consciousness"));
    }

    #[test]
    fn test_ordinary_round_yields_only_patterns() {
        let thresholds = DeliberationThresholds::default();
        let insights =
            thresholds.extract_insights(&[summary(1, RoundKind::Vision, 0.6, &["p1", "p2"])]);
        assert_eq!(insights, vec!["Round 1: p1", "Round 1: p2"]);
    }

    #[test]
    fn test_high_consciousness_is_strict() {
        let thresholds = DeliberationThresholds::default();
        let insights = thresholds.extract_insights(&[summary(1, RoundKind::Vision, 0.8, &[])]);
        assert!(insights.is_empty());
    }

    #[test]
    fn test_overall_score_is_last_round() {
        let rounds = [
            summary(1, RoundKind::Opening, 0.9, &[]),
            summary(2, RoundKind::Synthesis, 0.4, &[]),
        ];
        assert_eq!(overall_score(&rounds), 0.4);
        assert_eq!(overall_score(&[]), 0.0);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let thresholds = DeliberationThresholds {
            consensus: -0.1,
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
        assert!(DeliberationThresholds::default().validate().is_ok());
    }
}
