//! Session observer port
//!
//! Defines the interface for reporting progress while a session convenes.
//! Implementations live in the presentation layer (console progress) and the
//! infrastructure layer (structured event logs).

use council_domain::{RoundSpec, RoundSummary, SessionResult, SkippedRound};
use serde::Serialize;

/// How a single voice call ended within a round
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VoiceOutcome {
    Responded { score: f64, latency_ms: u64 },
    TimedOut,
    Failed { reason: String },
}

impl VoiceOutcome {
    pub fn is_response(&self) -> bool {
        matches!(self, VoiceOutcome::Responded { .. })
    }
}

/// Callback for progress updates during a session
///
/// Only the round callbacks are required; everything else defaults to a
/// no-op.
pub trait SessionObserver: Send + Sync {
    /// Called once before any voice connects
    fn on_session_start(&self, _session_id: &str, _name: &str, _participant_count: usize) {}

    fn on_voice_connected(&self, _voice_id: &str) {}

    fn on_voice_failed(&self, _voice_id: &str, _reason: &str) {}

    /// Called after gathering with the quorum decision
    fn on_admission(&self, _connected: usize, _min_voices: usize, _admitted: bool) {}

    /// Called when a round starts
    fn on_round_start(&self, round_number: usize, spec: &RoundSpec, voice_count: usize);

    /// Called as each voice call settles
    fn on_voice_response(&self, round_number: usize, voice_id: &str, outcome: &VoiceOutcome);

    /// Called when a round completes
    fn on_round_complete(&self, summary: &RoundSummary);

    /// Called when a round is recorded as skipped
    fn on_round_skipped(&self, _skipped: &SkippedRound) {}

    /// Called once with the final result, after teardown
    fn on_session_complete(&self, _result: &SessionResult) {}
}

/// No-op observer for when progress reporting is not needed
pub struct NoObserver;

impl SessionObserver for NoObserver {
    fn on_round_start(&self, _round_number: usize, _spec: &RoundSpec, _voice_count: usize) {}
    fn on_voice_response(&self, _round_number: usize, _voice_id: &str, _outcome: &VoiceOutcome) {}
    fn on_round_complete(&self, _summary: &RoundSummary) {}
}

/// An observer that delegates to multiple inner observers.
///
/// Lets the console progress display and the JSONL event log watch the
/// same session.
pub struct CompositeObserver<'a> {
    delegates: Vec<&'a dyn SessionObserver>,
}

impl<'a> CompositeObserver<'a> {
    pub fn new(delegates: Vec<&'a dyn SessionObserver>) -> Self {
        Self { delegates }
    }

    pub fn push(&mut self, observer: &'a dyn SessionObserver) {
        self.delegates.push(observer);
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl SessionObserver for CompositeObserver<'_> {
    fn on_session_start(&self, session_id: &str, name: &str, participant_count: usize) {
        delegate!(self, on_session_start, session_id, name, participant_count);
    }

    fn on_voice_connected(&self, voice_id: &str) {
        delegate!(self, on_voice_connected, voice_id);
    }

    fn on_voice_failed(&self, voice_id: &str, reason: &str) {
        delegate!(self, on_voice_failed, voice_id, reason);
    }

    fn on_admission(&self, connected: usize, min_voices: usize, admitted: bool) {
        delegate!(self, on_admission, connected, min_voices, admitted);
    }

    fn on_round_start(&self, round_number: usize, spec: &RoundSpec, voice_count: usize) {
        delegate!(self, on_round_start, round_number, spec, voice_count);
    }

    fn on_voice_response(&self, round_number: usize, voice_id: &str, outcome: &VoiceOutcome) {
        delegate!(self, on_voice_response, round_number, voice_id, outcome);
    }

    fn on_round_complete(&self, summary: &RoundSummary) {
        delegate!(self, on_round_complete, summary);
    }

    fn on_round_skipped(&self, skipped: &SkippedRound) {
        delegate!(self, on_round_skipped, skipped);
    }

    fn on_session_complete(&self, result: &SessionResult) {
        delegate!(self, on_session_complete, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::RoundKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingObserver {
        round_starts: AtomicUsize,
        responses: AtomicUsize,
        failures: AtomicUsize,
    }

    impl CountingObserver {
        fn new() -> Self {
            Self {
                round_starts: AtomicUsize::new(0),
                responses: AtomicUsize::new(0),
                failures: AtomicUsize::new(0),
            }
        }
    }

    impl SessionObserver for CountingObserver {
        fn on_voice_failed(&self, _voice_id: &str, _reason: &str) {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        fn on_round_start(&self, _round_number: usize, _spec: &RoundSpec, _voice_count: usize) {
            self.round_starts.fetch_add(1, Ordering::Relaxed);
        }
        fn on_voice_response(&self, _round_number: usize, _voice_id: &str, outcome: &VoiceOutcome) {
            if outcome.is_response() {
                self.responses.fetch_add(1, Ordering::Relaxed);
            }
        }
        fn on_round_complete(&self, _summary: &RoundSummary) {}
    }

    #[test]
    fn test_composite_delegates_to_all_observers() {
        let o1 = CountingObserver::new();
        let o2 = CountingObserver::new();
        let composite = CompositeObserver::new(vec![&o1, &o2]);

        let spec = RoundSpec::new(RoundKind::Opening, "hello");
        composite.on_round_start(1, &spec, 3);
        composite.on_voice_response(
            1,
            "echo:a#0",
            &VoiceOutcome::Responded {
                score: 0.5,
                latency_ms: 10,
            },
        );
        composite.on_voice_response(1, "echo:b#1", &VoiceOutcome::TimedOut);
        composite.on_voice_failed("echo:c#2", "refused");

        for o in [&o1, &o2] {
            assert_eq!(o.round_starts.load(Ordering::Relaxed), 1);
            assert_eq!(o.responses.load(Ordering::Relaxed), 1);
            assert_eq!(o.failures.load(Ordering::Relaxed), 1);
        }
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_value(VoiceOutcome::Failed {
            reason: "boom".into(),
        })
        .unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["reason"], "boom");
    }
}
