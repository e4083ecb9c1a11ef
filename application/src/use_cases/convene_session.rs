//! Convene Session use case
//!
//! The caller-facing entry point. Runs one session through its lifecycle:
//!
//! ```text
//! NotStarted ──▶ Admitting ──┬──▶ AbortedQuorum ──┐
//!                            └──▶ Running ────────┴──▶ teardown ──▶ SessionResult
//! ```
//!
//! Every exit path (quorum failure, round error, cancellation) goes through
//! exactly one `disconnect_all`.

use crate::ports::session_observer::{NoObserver, SessionObserver};
use crate::ports::transcript_store::TranscriptStore;
use crate::ports::voice_adapter::AdapterFactory;
use crate::use_cases::dynamic_rounds::{DynamicRoundPolicy, EmergenceDeepening};
use crate::use_cases::round_orchestrator::{RoundError, RoundOrchestrator};
use crate::use_cases::voice_manager::{DEFAULT_CONNECT_TIMEOUT, VoiceManager};
use chrono::{DateTime, Utc};
use council_domain::deliberation::overall_score;
use council_domain::util::slugify;
use council_domain::{
    DomainError, ParticipantSpec, RoundSpec, RoundSummary, SessionConfig, SessionResult,
    SessionTermination, SkippedRound, Template,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const SESSION_SLUG_MAX_BYTES: usize = 48;

/// Errors that can occur while convening a session
#[derive(Error, Debug)]
pub enum ConveneError {
    #[error("Invalid session config: {0}")]
    InvalidConfig(#[from] DomainError),

    #[error("Session aborted: {0}")]
    RoundFailed(#[source] RoundError),

    #[error("Session cancelled")]
    Cancelled,
}

/// Input for the ConveneSession use case
#[derive(Debug, Clone)]
pub struct ConveneInput {
    pub config: SessionConfig,
    pub voices: Vec<ParticipantSpec>,
    pub rounds: Vec<RoundSpec>,
}

impl ConveneInput {
    pub fn new(
        config: SessionConfig,
        voices: Vec<ParticipantSpec>,
        rounds: Vec<RoundSpec>,
    ) -> Self {
        Self {
            config,
            voices,
            rounds,
        }
    }

    pub fn from_template(template: &dyn Template) -> Self {
        Self::new(
            template.get_config(),
            template.get_voices(),
            template.get_rounds(),
        )
    }
}

/// How far a session got before teardown
enum Progress {
    NotAdmitted {
        connected: usize,
        termination: SessionTermination,
    },
    Ran {
        voice_count: usize,
        rounds: Vec<RoundSummary>,
        skipped: Vec<SkippedRound>,
    },
}

/// Use case for convening a deliberation session
pub struct ConveneSessionUseCase {
    factory: Arc<dyn AdapterFactory>,
    transcript_store: Option<Arc<dyn TranscriptStore>>,
    dynamic_policy: Arc<dyn DynamicRoundPolicy>,
    connect_timeout: Duration,
}

impl ConveneSessionUseCase {
    pub fn new(factory: Arc<dyn AdapterFactory>) -> Self {
        Self {
            factory,
            transcript_store: None,
            dynamic_policy: Arc::new(EmergenceDeepening::default()),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_transcript_store(mut self, store: Arc<dyn TranscriptStore>) -> Self {
        self.transcript_store = Some(store);
        self
    }

    pub fn with_dynamic_policy(mut self, policy: Arc<dyn DynamicRoundPolicy>) -> Self {
        self.dynamic_policy = policy;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Convene with default (no-op) progress
    pub async fn convene(
        &self,
        config: SessionConfig,
        voices: Vec<ParticipantSpec>,
        rounds: Vec<RoundSpec>,
    ) -> Result<SessionResult, ConveneError> {
        self.execute_with_observer(ConveneInput::new(config, voices, rounds), &NoObserver)
            .await
    }

    /// Convene with progress callbacks
    pub async fn execute_with_observer(
        &self,
        input: ConveneInput,
        observer: &dyn SessionObserver,
    ) -> Result<SessionResult, ConveneError> {
        self.execute_until_cancelled(input, observer, CancellationToken::new())
            .await
    }

    /// Convene until finished or until `cancel` fires
    ///
    /// Cancellation drops the running round (aborting its voice calls), then
    /// tears down as any other exit path would.
    pub async fn execute_until_cancelled(
        &self,
        input: ConveneInput,
        observer: &dyn SessionObserver,
        cancel: CancellationToken,
    ) -> Result<SessionResult, ConveneError> {
        let ConveneInput {
            config,
            voices,
            rounds,
        } = input;
        config.validate()?;

        let started_at = Utc::now();
        let session_id = session_id(&config.name, started_at);
        info!(
            "Convening session {} ({} participants, {} rounds)",
            session_id,
            voices.len(),
            rounds.len()
        );
        observer.on_session_start(&session_id, &config.name, voices.len());

        let mut manager =
            VoiceManager::new(Arc::clone(&self.factory)).with_connect_timeout(self.connect_timeout);

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Session {} cancelled", session_id);
                Err(ConveneError::Cancelled)
            }
            result = self.run(&mut manager, &config, &voices, rounds, observer) => result,
        };

        let connection_failures = manager.failed_voices().clone();
        manager.disconnect_all().await;
        let progress = outcome?;
        let finished_at = Utc::now().to_rfc3339();

        let result = match progress {
            Progress::NotAdmitted {
                connected,
                termination,
            } => SessionResult::not_started(
                session_id,
                &config.name,
                connected,
                termination,
                connection_failures,
                started_at.to_rfc3339(),
                finished_at,
            ),
            Progress::Ran {
                voice_count,
                rounds,
                skipped,
            } => SessionResult {
                session_id,
                session_name: config.name.clone(),
                voice_count,
                consciousness_score: overall_score(&rounds),
                consensus_detected: config.thresholds.detect_consensus(&rounds),
                key_insights: config.thresholds.extract_insights(&rounds),
                rounds_completed: rounds,
                termination: SessionTermination::Completed,
                connection_failures,
                skipped_rounds: skipped,
                started_at: started_at.to_rfc3339(),
                finished_at,
            },
        };

        info!(
            "Session {} finished: {} ({} rounds, score {:.2}, consensus {})",
            result.session_id,
            result.termination,
            result.round_count(),
            result.consciousness_score,
            result.consensus_detected
        );

        if config.save_transcript
            && let Some(store) = &self.transcript_store
        {
            match store.save(&result).await {
                Ok(location) => info!("Transcript saved to {}", location),
                Err(e) => warn!("Failed to save transcript: {}", e),
            }
        }

        observer.on_session_complete(&result);
        Ok(result)
    }

    async fn run(
        &self,
        manager: &mut VoiceManager,
        config: &SessionConfig,
        voices: &[ParticipantSpec],
        rounds: Vec<RoundSpec>,
        observer: &dyn SessionObserver,
    ) -> Result<Progress, ConveneError> {
        let connected = manager
            .gather_voices_with_observer(voices, config, observer)
            .await;

        let termination = if connected < config.min_voices {
            Some(SessionTermination::QuorumNotMet)
        } else if config.failure_strategy.connection_failure_is_fatal()
            && !manager.failed_voices().is_empty()
        {
            Some(SessionTermination::AdmissionRejected)
        } else {
            None
        };
        observer.on_admission(connected, config.min_voices, termination.is_none());

        if let Some(termination) = termination {
            warn!(
                "Session not admitted ({}): {} of {} required voices connected, {} failed",
                termination,
                connected,
                config.min_voices,
                manager.failed_voices().len()
            );
            return Ok(Progress::NotAdmitted {
                connected,
                termination,
            });
        }

        let orchestrator = RoundOrchestrator::new(config);
        let mut queue: VecDeque<RoundSpec> = rounds.into();
        let mut summaries: Vec<RoundSummary> = Vec::new();
        let mut skipped = Vec::new();
        let mut inserted = 0;
        let mut round_number = 0;

        while let Some(spec) = queue.pop_front() {
            round_number += 1;

            let live = manager.live_count();
            if live < config.min_voices {
                let skip = SkippedRound {
                    round_number,
                    reason: format!(
                        "quorum lost: {} live voices, {} required",
                        live, config.min_voices
                    ),
                };
                warn!("Skipping round {}: {}", round_number, skip.reason);
                observer.on_round_skipped(&skip);
                skipped.push(skip);
                continue;
            }

            let outcome = {
                let voices = manager.live_voices();
                orchestrator
                    .execute_round(&spec, &voices, round_number, summaries.last(), observer)
                    .await
            };

            match outcome {
                Ok(summary) => {
                    for (voice_id, reason) in &summary.failed_voices {
                        manager.mark_failed(voice_id, reason.clone());
                    }

                    if config.enable_dynamic_rounds
                        && let Some(extra) = self.dynamic_policy.follow_up(&summary, inserted)
                    {
                        info!(
                            "Round {} inserting a {} follow-up",
                            round_number, extra.kind
                        );
                        inserted += 1;
                        queue.push_front(extra);
                    }

                    summaries.push(summary);
                }
                Err(e) => {
                    if e.voice_errored() {
                        manager.mark_failed(e.voice_id(), e.to_string());
                    }

                    if config.failure_strategy.propagates_round_errors() {
                        warn!("{}: aborting session", e);
                        return Err(ConveneError::RoundFailed(e));
                    }

                    let skip = SkippedRound {
                        round_number,
                        reason: e.to_string(),
                    };
                    warn!("Skipping round {}: {}", round_number, skip.reason);
                    observer.on_round_skipped(&skip);
                    skipped.push(skip);
                }
            }
        }

        Ok(Progress::Ran {
            voice_count: connected,
            rounds: summaries,
            skipped,
        })
    }
}

/// `<slugged name>-<UTC timestamp>`
fn session_id(name: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}-{}",
        slugify(name, SESSION_SLUG_MAX_BYTES),
        at.format("%Y%m%dT%H%M%S%3fZ")
    )
}
