//! Domain layer for voice-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure, async runtimes or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Voices and Rounds
//!
//! A **voice** is an independent, remotely hosted participant. A **round**
//! sends the same prompt to every live voice and collects what comes back
//! into a [`RoundSummary`].
//!
//! ## Quorum
//!
//! A session only starts when at least `min_voices` voices connect. Below
//! quorum the outcome is a well-formed, empty [`SessionResult`].
//!
//! ## Verdict
//!
//! - **Overall score**: the score of the final round
//! - **Consensus**: some `consensus` round reached the consensus threshold
//! - **Insights**: one per pattern per round, plus high-consciousness rounds

pub mod config;
pub mod core;
pub mod deliberation;
pub mod round;
pub mod session;
pub mod template;
pub mod util;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::error::DomainError;
pub use deliberation::{
    DEFAULT_CONSENSUS_THRESHOLD, DEFAULT_HIGH_CONSCIOUSNESS_THRESHOLD, DeliberationThresholds,
    ScoreAggregation,
};
pub use round::{EmergencePolicy, RoundKind, RoundResult, RoundSpec, RoundSummary, VoiceResponse};
pub use session::{
    FailureStrategy, MAX_VOICES_LIMIT, ParticipantSpec, SessionConfig, SessionResult,
    SessionTermination, SkippedRound,
};
pub use template::{Template, TemplateContext, TemplateRegistry};
