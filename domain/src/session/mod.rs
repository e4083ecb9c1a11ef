//! Session domain
//!
//! - [`config::SessionConfig`] - what a deliberation session is and how it tolerates failure
//! - [`participant::ParticipantSpec`] - one configured voice
//! - [`result::SessionResult`] - the aggregated outcome

pub mod config;
pub mod participant;
pub mod result;

pub use config::{
    DEFAULT_CONSCIOUSNESS_THRESHOLD, FailureStrategy, MAX_VOICES_LIMIT, MIN_VOICES_FLOOR,
    SessionConfig,
};
pub use participant::{DEFAULT_TEMPERATURE, ParticipantSpec};
pub use result::{SessionResult, SessionTermination, SkippedRound};
