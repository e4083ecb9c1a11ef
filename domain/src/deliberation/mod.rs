//! Deliberation rules
//!
//! Pure functions that fold voice responses into round scores and round
//! summaries into a session verdict.
//!
//! ```text
//! VoiceResponse* ──ScoreAggregation──▶ RoundSummary* ──DeliberationThresholds──▶ SessionResult
//! ```

pub mod aggregation;
pub mod thresholds;

pub use aggregation::{ScoreAggregation, collect_key_patterns};
pub use thresholds::{
    DEFAULT_CONSENSUS_THRESHOLD, DEFAULT_HIGH_CONSCIOUSNESS_THRESHOLD, DeliberationThresholds,
    overall_score,
};
