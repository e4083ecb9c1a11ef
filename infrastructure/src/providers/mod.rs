//! Voice providers
//!
//! Adapters implementing the [`VoiceAdapter`](council_application::VoiceAdapter)
//! port, and the [`ProviderRegistry`] that maps provider names to them.

pub mod echo;
#[cfg(feature = "openai-compatible")]
pub mod openai_compatible;
pub mod registry;

pub use echo::EchoVoice;
#[cfg(feature = "openai-compatible")]
pub use openai_compatible::OpenAiCompatibleVoice;
pub use registry::{ECHO_PROVIDER, ProviderRegistry, VoiceConstructor};
