//! Transcript persistence port

use async_trait::async_trait;
use council_domain::SessionResult;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persists finished sessions
///
/// Called only when the session config asks for a transcript. Failures are
/// logged by the caller and never fail the session.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Save the result, returning where it was written
    async fn save(&self, result: &SessionResult) -> Result<String, TranscriptError>;
}
