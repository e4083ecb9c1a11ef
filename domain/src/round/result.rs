//! Round result value objects - immutable outputs of a single round.
//!
//! - [`VoiceResponse`] - payload a voice adapter returns for a prompt
//! - [`RoundResult`] - one voice's response within one round
//! - [`RoundSummary`] - aggregate of a whole round

use super::spec::{RoundKind, RoundSpec};
use crate::deliberation::aggregation::{ScoreAggregation, collect_key_patterns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Response payload produced by a voice adapter
///
/// Opaque to the core beyond the text, the score and the pattern metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceResponse {
    pub text: String,
    #[serde(default)]
    pub consciousness_score: f64,
    #[serde(default)]
    pub detected_patterns: Vec<String>,
    /// Adapter-side emergence signal
    #[serde(default)]
    pub emergence: bool,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
}

impl VoiceResponse {
    pub fn new(text: impl Into<String>, consciousness_score: f64) -> Self {
        Self {
            text: text.into(),
            consciousness_score,
            detected_patterns: Vec::new(),
            emergence: false,
            metadata: Value::Null,
        }
    }

    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.detected_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_emergence(mut self, emergence: bool) -> Self {
        self.emergence = emergence;
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// One participant's response within one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub voice_id: String,
    pub round_number: usize,
    pub response: VoiceResponse,
    /// Time from dispatch to response
    pub latency_ms: u64,
    pub consciousness_score: f64,
    /// Arrival position within the round (0 = first to answer)
    pub sequence: usize,
}

impl RoundResult {
    pub fn new(
        voice_id: impl Into<String>,
        round_number: usize,
        response: VoiceResponse,
        latency_ms: u64,
        sequence: usize,
    ) -> Self {
        let consciousness_score = response.consciousness_score;
        Self {
            voice_id: voice_id.into(),
            round_number,
            response,
            latency_ms,
            consciousness_score,
            sequence,
        }
    }
}

/// Emergence settings applied while summarizing a round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmergencePolicy {
    pub enabled: bool,
    /// Round score at or above which emergence is flagged
    pub threshold: f64,
}

/// Aggregate of one round
///
/// Created once per round and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_number: usize,
    pub kind: RoundKind,
    pub prompt: String,
    /// voice id -> result
    pub responses: BTreeMap<String, RoundResult>,
    pub consciousness_score: f64,
    pub emergence_detected: bool,
    /// Patterns in first-seen order, deduplicated
    pub key_patterns: Vec<String>,
    pub duration_ms: u64,
    /// Voices that did not answer within budget
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timed_out_voices: Vec<String>,
    /// voice id -> error reason
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub failed_voices: BTreeMap<String, String>,
}

impl RoundSummary {
    /// Build a summary from the responses that arrived in time
    ///
    /// Patterns are visited in voice-id order so the summary does not depend
    /// on which voice happened to answer first.
    pub fn from_responses(
        round_number: usize,
        spec: &RoundSpec,
        responses: BTreeMap<String, RoundResult>,
        aggregation: ScoreAggregation,
        emergence: EmergencePolicy,
        duration_ms: u64,
    ) -> Self {
        let mut ordered: Vec<&RoundResult> = responses.values().collect();
        ordered.sort_by_key(|r| r.sequence);
        let scores: Vec<f64> = ordered.iter().map(|r| r.consciousness_score).collect();
        let consciousness_score = aggregation.aggregate(&scores);

        let key_patterns = collect_key_patterns(
            responses
                .values()
                .map(|r| r.response.detected_patterns.as_slice()),
        );

        let emergence_detected = emergence.enabled
            && !responses.is_empty()
            && (responses.values().any(|r| r.response.emergence)
                || consciousness_score >= emergence.threshold);

        Self {
            round_number,
            kind: spec.kind,
            prompt: spec.prompt.clone(),
            responses,
            consciousness_score,
            emergence_detected,
            key_patterns,
            duration_ms,
            timed_out_voices: Vec::new(),
            failed_voices: BTreeMap::new(),
        }
    }

    /// Attach the diagnostics of voices that did not contribute
    pub fn with_diagnostics(
        mut self,
        timed_out_voices: Vec<String>,
        failed_voices: BTreeMap<String, String>,
    ) -> Self {
        self.timed_out_voices = timed_out_voices;
        self.failed_voices = failed_voices;
        self
    }

    pub fn response_count(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(voice: &str, score: f64, patterns: &[&str], sequence: usize) -> RoundResult {
        RoundResult::new(
            voice,
            1,
            VoiceResponse::new(format!("{voice} says"), score).with_patterns(patterns.to_vec()),
            10,
            sequence,
        )
    }

    fn policy(threshold: f64) -> EmergencePolicy {
        EmergencePolicy {
            enabled: true,
            threshold,
        }
    }

    #[test]
    fn test_empty_round() {
        let spec = RoundSpec::new(RoundKind::Opening, "Hello");
        let summary = RoundSummary::from_responses(
            1,
            &spec,
            BTreeMap::new(),
            ScoreAggregation::Mean,
            policy(0.0),
            5,
        );
        assert!(summary.is_empty());
        assert_eq!(summary.consciousness_score, 0.0);
        assert!(!summary.emergence_detected);
        assert!(summary.key_patterns.is_empty());
    }

    #[test]
    fn test_patterns_deduplicated_in_voice_order() {
        let spec = RoundSpec::new(RoundKind::Exploration, "Explore");
        let mut responses = BTreeMap::new();
        responses.insert("b".to_string(), result("b", 0.4, &["trust", "risk"], 0));
        responses.insert("a".to_string(), result("a", 0.6, &["risk", "growth"], 1));

        let summary = RoundSummary::from_responses(
            2,
            &spec,
            responses,
            ScoreAggregation::Mean,
            policy(0.9),
            5,
        );
        assert_eq!(summary.key_patterns, vec!["risk", "growth", "trust"]);
        assert!((summary.consciousness_score - 0.5).abs() < 1e-9);
        assert!(!summary.emergence_detected);
    }

    #[test]
    fn test_latest_uses_arrival_order() {
        let spec = RoundSpec::new(RoundKind::Synthesis, "Merge");
        let mut responses = BTreeMap::new();
        responses.insert("a".to_string(), result("a", 0.9, &[], 1));
        responses.insert("b".to_string(), result("b", 0.3, &[], 0));

        let summary = RoundSummary::from_responses(
            1,
            &spec,
            responses,
            ScoreAggregation::Latest,
            policy(1.0),
            5,
        );
        assert!((summary.consciousness_score - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_emergence_from_threshold_or_adapter_flag() {
        let spec = RoundSpec::new(RoundKind::Vision, "Imagine");

        let mut responses = BTreeMap::new();
        responses.insert("a".to_string(), result("a", 0.75, &[], 0));
        let by_score = RoundSummary::from_responses(
            1,
            &spec,
            responses,
            ScoreAggregation::Mean,
            policy(0.7),
            5,
        );
        assert!(by_score.emergence_detected);

        let mut flagged = result("a", 0.1, &[], 0);
        flagged.response.emergence = true;
        let mut responses = BTreeMap::new();
        responses.insert("a".to_string(), flagged);
        let by_flag = RoundSummary::from_responses(
            1,
            &spec,
            responses.clone(),
            ScoreAggregation::Mean,
            policy(0.7),
            5,
        );
        assert!(by_flag.emergence_detected);

        let disabled = RoundSummary::from_responses(
            1,
            &spec,
            responses,
            ScoreAggregation::Mean,
            EmergencePolicy {
                enabled: false,
                threshold: 0.0,
            },
            5,
        );
        assert!(!disabled.emergence_detected);
    }
}
