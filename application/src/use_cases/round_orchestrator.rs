//! Round orchestrator
//!
//! Executes one round: the same prompt goes to every live voice in parallel,
//! each call bounded by the round's per-voice budget, and whatever comes back
//! in time is folded into a [`RoundSummary`].
//!
//! ```text
//!            ┌──────────── JoinSet ────────────┐
//! RoundSpec ─┼─▶ timeout(generate) voice #0 ───┼─┐
//!            ├─▶ timeout(generate) voice #1 ───┼─┼─▶ RoundSummary
//!            └─▶ timeout(generate) voice #n ───┘ ┘
//! ```
//!
//! The set is always drained or shut down before the round returns, so no
//! voice call outlives its round.

use crate::ports::session_observer::{SessionObserver, VoiceOutcome};
use crate::ports::voice_adapter::{PeerResponse, RoundContext, RoundOverrides, VoiceRequest};
use crate::use_cases::voice_manager::LiveVoice;
use council_domain::core::duration::as_millis_u64;
use council_domain::{
    EmergencePolicy, FailureStrategy, RoundResult, RoundSpec, RoundSummary, ScoreAggregation,
    SessionConfig,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Why a required response is missing
#[derive(Debug, Clone, PartialEq)]
pub enum MissingResponse {
    TimedOut { budget_secs: f64 },
    Failed(String),
}

impl std::fmt::Display for MissingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingResponse::TimedOut { budget_secs } => {
                write!(f, "did not answer within {budget_secs}s")
            }
            MissingResponse::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Errors that end a round without a summary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoundError {
    /// A voice did not answer a round that requires every voice
    #[error("Round {round_number} incomplete: voice {voice_id} {cause}")]
    IncompleteRound {
        round_number: usize,
        voice_id: String,
        cause: MissingResponse,
    },

    /// A voice errored under a strategy that does not tolerate voice errors
    #[error("Round {round_number} failed: voice {voice_id} errored: {reason}")]
    VoiceFailed {
        round_number: usize,
        voice_id: String,
        reason: String,
    },
}

impl RoundError {
    pub fn round_number(&self) -> usize {
        match self {
            RoundError::IncompleteRound { round_number, .. }
            | RoundError::VoiceFailed { round_number, .. } => *round_number,
        }
    }

    pub fn voice_id(&self) -> &str {
        match self {
            RoundError::IncompleteRound { voice_id, .. }
            | RoundError::VoiceFailed { voice_id, .. } => voice_id,
        }
    }

    /// Whether the offending voice errored (as opposed to running late)
    pub fn voice_errored(&self) -> bool {
        !matches!(
            self,
            RoundError::IncompleteRound {
                cause: MissingResponse::TimedOut { .. },
                ..
            }
        )
    }
}

pub struct RoundOrchestrator {
    session_name: String,
    purpose: String,
    failure_strategy: FailureStrategy,
    enable_reciprocity: bool,
    aggregation: ScoreAggregation,
    emergence: EmergencePolicy,
}

impl RoundOrchestrator {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            session_name: config.name.clone(),
            purpose: config.purpose.clone(),
            failure_strategy: config.failure_strategy,
            enable_reciprocity: config.enable_reciprocity,
            aggregation: config.score_aggregation,
            emergence: EmergencePolicy {
                enabled: config.enable_consciousness_detection,
                threshold: config.consciousness_threshold,
            },
        }
    }

    /// Execute one round against the given voices
    ///
    /// `previous` is the summary of the round before, used for reciprocity.
    pub async fn execute_round(
        &self,
        spec: &RoundSpec,
        voices: &[&LiveVoice],
        round_number: usize,
        previous: Option<&RoundSummary>,
        observer: &dyn SessionObserver,
    ) -> Result<RoundSummary, RoundError> {
        info!(
            "Round {} ({}) with {} voices",
            round_number,
            spec.kind,
            voices.len()
        );
        observer.on_round_start(round_number, spec, voices.len());

        let round_started = Instant::now();
        let budget = spec.duration_per_voice;
        let mut join_set = JoinSet::new();
        let mut task_voices = HashMap::new();

        for voice in voices {
            let request = self.build_request(spec, voice, round_number, previous);
            let adapter = Arc::clone(&voice.adapter);
            let voice_id = voice.id.clone();

            let handle = join_set.spawn(async move {
                let started = Instant::now();
                let result = tokio::time::timeout(budget, adapter.generate(&request)).await;
                (voice_id, started.elapsed(), result)
            });
            task_voices.insert(handle.id(), voice.id.clone());
        }

        let mut responses = BTreeMap::new();
        let mut timed_out = Vec::new();
        let mut failed = BTreeMap::new();

        while let Some(joined) = join_set.join_next_with_id().await {
            let (voice_id, outcome) = match joined {
                Ok((_, (voice_id, elapsed, Ok(Ok(response))))) => {
                    let latency_ms = as_millis_u64(elapsed);
                    debug!("Voice {} responded in {}ms", voice_id, latency_ms);
                    let outcome = VoiceOutcome::Responded {
                        score: response.consciousness_score,
                        latency_ms,
                    };
                    let sequence = responses.len();
                    responses.insert(
                        voice_id.clone(),
                        RoundResult::new(&voice_id, round_number, response, latency_ms, sequence),
                    );
                    (voice_id, outcome)
                }
                Ok((_, (voice_id, _, Ok(Err(e))))) => {
                    warn!("Voice {} failed in round {}: {}", voice_id, round_number, e);
                    (voice_id, VoiceOutcome::Failed { reason: e.to_string() })
                }
                Ok((_, (voice_id, _, Err(_)))) => {
                    warn!(
                        "Voice {} exceeded its {:?} budget in round {}",
                        voice_id, budget, round_number
                    );
                    (voice_id, VoiceOutcome::TimedOut)
                }
                Err(e) => {
                    let voice_id = task_voices
                        .get(&e.id())
                        .cloned()
                        .unwrap_or_else(|| format!("task-{}", e.id()));
                    warn!("Voice {} task aborted: {}", voice_id, e);
                    (voice_id, VoiceOutcome::Failed { reason: e.to_string() })
                }
            };

            observer.on_voice_response(round_number, &voice_id, &outcome);

            let fatal = match &outcome {
                VoiceOutcome::Responded { .. } => None,
                VoiceOutcome::Failed { reason } if self.failure_strategy.voice_error_is_fatal() => {
                    Some(RoundError::VoiceFailed {
                        round_number,
                        voice_id: voice_id.clone(),
                        reason: reason.clone(),
                    })
                }
                VoiceOutcome::Failed { reason } if spec.require_all_voices => {
                    Some(RoundError::IncompleteRound {
                        round_number,
                        voice_id: voice_id.clone(),
                        cause: MissingResponse::Failed(reason.clone()),
                    })
                }
                VoiceOutcome::TimedOut if spec.require_all_voices => {
                    Some(RoundError::IncompleteRound {
                        round_number,
                        voice_id: voice_id.clone(),
                        cause: MissingResponse::TimedOut {
                            budget_secs: budget.as_secs_f64(),
                        },
                    })
                }
                VoiceOutcome::Failed { reason } => {
                    failed.insert(voice_id, reason.clone());
                    None
                }
                VoiceOutcome::TimedOut => {
                    timed_out.push(voice_id);
                    None
                }
            };

            if let Some(error) = fatal {
                warn!("Aborting round {}: {}", round_number, error);
                join_set.shutdown().await;
                return Err(error);
            }
        }

        timed_out.sort();
        let summary = RoundSummary::from_responses(
            round_number,
            spec,
            responses,
            self.aggregation,
            self.emergence,
            as_millis_u64(round_started.elapsed()),
        )
        .with_diagnostics(timed_out, failed);

        info!(
            "Round {} complete: {}/{} responses, score {:.2}{}",
            round_number,
            summary.response_count(),
            voices.len(),
            summary.consciousness_score,
            if summary.emergence_detected {
                ", emergence"
            } else {
                ""
            }
        );
        observer.on_round_complete(&summary);
        Ok(summary)
    }

    fn build_request(
        &self,
        spec: &RoundSpec,
        voice: &LiveVoice,
        round_number: usize,
        previous: Option<&RoundSummary>,
    ) -> VoiceRequest {
        let peer_responses = match previous {
            Some(summary) if self.enable_reciprocity => summary
                .responses
                .iter()
                .filter(|(id, _)| id.as_str() != voice.id)
                .map(|(id, result)| PeerResponse {
                    voice_id: id.clone(),
                    text: result.response.text.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };

        let mut config = voice.spec.config.clone();
        config.extend(spec.overrides_for(&voice.id, voice.spec.role.as_deref()));

        VoiceRequest {
            prompt: spec.prompt.clone(),
            context: RoundContext {
                session_name: self.session_name.clone(),
                purpose: self.purpose.clone(),
                round_number,
                round_kind: spec.kind,
                voice_id: voice.id.clone(),
                role: voice.spec.role.clone(),
                instructions: voice.spec.instructions.clone(),
                peer_responses,
                prior_patterns: previous.map(|s| s.key_patterns.clone()).unwrap_or_default(),
            },
            overrides: RoundOverrides {
                temperature: spec.temperature.unwrap_or(voice.spec.temperature),
                max_tokens: spec.max_tokens,
                config,
            },
        }
    }
}
