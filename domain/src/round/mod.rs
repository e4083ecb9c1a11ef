//! Round domain
//!
//! A round is one synchronized exchange in which the same prompt is sent to
//! every live voice. [`RoundSpec`] describes what to ask, [`RoundSummary`]
//! records what came back.

pub mod result;
pub mod spec;

pub use result::{EmergencePolicy, RoundResult, RoundSummary, VoiceResponse};
pub use spec::{DEFAULT_DURATION_PER_VOICE, RoundKind, RoundSpec};
