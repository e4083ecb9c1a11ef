//! Session result (Value Object)

use crate::round::RoundSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionTermination {
    /// Quorum held and every round ran (or was skipped under `adaptive`)
    Completed,
    /// Fewer voices than `min_voices` connected
    QuorumNotMet,
    /// `strict` / `fail_fast` refused to start after a connection failure
    AdmissionRejected,
}

impl SessionTermination {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionTermination::Completed => "completed",
            SessionTermination::QuorumNotMet => "quorum_not_met",
            SessionTermination::AdmissionRejected => "admission_rejected",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SessionTermination::Completed)
    }
}

impl std::fmt::Display for SessionTermination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A round that failed and was skipped under the `adaptive` strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRound {
    pub round_number: usize,
    pub reason: String,
}

/// Final output of a deliberation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_id: String,
    pub session_name: String,
    /// Number of voices connected at admission
    pub voice_count: usize,
    /// Completed rounds, ordered by round number
    pub rounds_completed: Vec<RoundSummary>,
    /// Score of the final round
    pub consciousness_score: f64,
    pub consensus_detected: bool,
    pub key_insights: Vec<String>,
    pub termination: SessionTermination,
    /// spec id -> reason, for voices that never connected
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub connection_failures: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_rounds: Vec<SkippedRound>,
    /// RFC 3339 timestamps
    pub started_at: String,
    pub finished_at: String,
}

impl SessionResult {
    /// Well-formed empty result for a session that never ran a round
    pub fn not_started(
        session_id: impl Into<String>,
        session_name: impl Into<String>,
        voice_count: usize,
        termination: SessionTermination,
        connection_failures: BTreeMap<String, String>,
        started_at: impl Into<String>,
        finished_at: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            session_name: session_name.into(),
            voice_count,
            rounds_completed: Vec::new(),
            consciousness_score: 0.0,
            consensus_detected: false,
            key_insights: Vec::new(),
            termination,
            connection_failures,
            skipped_rounds: Vec::new(),
            started_at: started_at.into(),
            finished_at: finished_at.into(),
        }
    }

    pub fn round_count(&self) -> usize {
        self.rounds_completed.len()
    }

    /// Whether any completed round flagged emergence
    pub fn emergence_detected(&self) -> bool {
        self.rounds_completed.iter().any(|r| r.emergence_detected)
    }
}
