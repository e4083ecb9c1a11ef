//! Dynamic round policy
//!
//! When a session enables dynamic rounds, a policy may insert follow-up
//! rounds after each completed round.

use council_domain::{RoundKind, RoundSpec, RoundSummary};

/// Decides whether to insert a follow-up round
pub trait DynamicRoundPolicy: Send + Sync {
    /// `inserted_so_far` counts the rounds this policy already added
    fn follow_up(&self, latest: &RoundSummary, inserted_so_far: usize) -> Option<RoundSpec>;
}

/// Deepens an emergent round with one extra exploration round
///
/// Follow-ups and concluding rounds are never deepened, and at most
/// `max_extra_rounds` are inserted per session.
#[derive(Debug, Clone)]
pub struct EmergenceDeepening {
    pub max_extra_rounds: usize,
}

pub const DEFAULT_MAX_EXTRA_ROUNDS: usize = 2;

impl Default for EmergenceDeepening {
    fn default() -> Self {
        Self {
            max_extra_rounds: DEFAULT_MAX_EXTRA_ROUNDS,
        }
    }
}

const DEEPENING_MARKER: &str = "Go deeper:";

impl DynamicRoundPolicy for EmergenceDeepening {
    fn follow_up(&self, latest: &RoundSummary, inserted_so_far: usize) -> Option<RoundSpec> {
        if !latest.emergence_detected
            || latest.kind.is_concluding()
            || inserted_so_far >= self.max_extra_rounds
            || latest.prompt.starts_with(DEEPENING_MARKER)
        {
            return None;
        }

        let focus = if latest.key_patterns.is_empty() {
            format!("what emerged during the {} round", latest.kind.display_name())
        } else {
            latest.key_patterns.join(", ")
        };

        Some(RoundSpec::new(
            RoundKind::Exploration,
            format!("{DEEPENING_MARKER} something new surfaced around {focus}. Explore it further together."),
        ))
    }
}
