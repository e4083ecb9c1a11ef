//! Application layer for voice-council
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    session_observer::{CompositeObserver, NoObserver, SessionObserver, VoiceOutcome},
    transcript_store::{TranscriptError, TranscriptStore},
    voice_adapter::{
        AdapterError, AdapterFactory, PeerResponse, RoundContext, RoundOverrides, VoiceAdapter,
        VoiceRequest,
    },
};
pub use use_cases::convene_session::{ConveneError, ConveneInput, ConveneSessionUseCase};
pub use use_cases::dynamic_rounds::{DynamicRoundPolicy, EmergenceDeepening};
pub use use_cases::round_orchestrator::{MissingResponse, RoundError, RoundOrchestrator};
pub use use_cases::voice_manager::{LiveVoice, VoiceManager};
