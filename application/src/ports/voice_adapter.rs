//! Voice adapter port
//!
//! Defines the capability interface every voice provider implements and the
//! factory the core uses to obtain adapters. Implementations (adapters) live
//! in the infrastructure layer.

use async_trait::async_trait;
use council_domain::{ParticipantSpec, RoundKind, VoiceResponse};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during voice adapter operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Connection error: {0}")]
    ConnectionFailed(String),

    #[error("Voice refused the connection")]
    ConnectionRefused,

    #[error("Voice is not connected")]
    NotConnected,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Another voice's answer from the previous round (reciprocity)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerResponse {
    pub voice_id: String,
    pub text: String,
}

/// Where in the session a request is made
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundContext {
    pub session_name: String,
    pub purpose: String,
    pub round_number: usize,
    pub round_kind: RoundKind,
    pub voice_id: String,
    pub role: Option<String>,
    pub instructions: Option<String>,
    /// Other voices' previous-round answers; empty without reciprocity
    pub peer_responses: Vec<PeerResponse>,
    /// Patterns surfaced by the previous round
    pub prior_patterns: Vec<String>,
}

/// Per-round overrides resolved for one voice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundOverrides {
    /// Round temperature if set, otherwise the participant's
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    /// Participant config merged with round-level voice overrides
    pub config: Map<String, Value>,
}

/// Everything a voice needs to answer one round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceRequest {
    pub prompt: String,
    pub context: RoundContext,
    pub overrides: RoundOverrides,
}

/// A connected (or connectable) voice
///
/// Every call is fallible; the core never lets an adapter error escape a
/// round or a session.
#[async_trait]
pub trait VoiceAdapter: Send + Sync {
    /// Establish the connection
    async fn connect(&self) -> Result<(), AdapterError>;

    /// Produce this voice's response for a round
    async fn generate(&self, request: &VoiceRequest) -> Result<VoiceResponse, AdapterError>;

    /// Release the connection
    async fn disconnect(&self) -> Result<(), AdapterError>;
}

/// Creates adapters for participant specs
///
/// Typically a provider-name -> constructor map; see the infrastructure
/// `ProviderRegistry`.
pub trait AdapterFactory: Send + Sync {
    fn create_adapter(
        &self,
        spec: &ParticipantSpec,
    ) -> Result<Arc<dyn VoiceAdapter>, AdapterError>;
}
