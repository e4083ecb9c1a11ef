//! Infrastructure layer for voice-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod transcript;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileConfig, FileOutputConfig,
    FileOutputFormat, FileProviderConfig, FileSessionConfig, FileTranscriptConfig, ProviderKind,
    Severity,
};
pub use logging::JsonlEventLog;
#[cfg(feature = "openai-compatible")]
pub use providers::OpenAiCompatibleVoice;
pub use providers::{ECHO_PROVIDER, EchoVoice, ProviderRegistry, VoiceConstructor};
pub use transcript::JsonTranscriptStore;
