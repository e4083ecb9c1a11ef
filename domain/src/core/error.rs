//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid session config: {0}")]
    InvalidConfig(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Invalid template context for '{template}': {reason}")]
    InvalidTemplateContext { template: String, reason: String },

    #[error("Unknown round kind: {0}")]
    UnknownRoundKind(String),

    #[error("Unknown failure strategy: {0}")]
    UnknownFailureStrategy(String),
}

impl DomainError {
    /// Check if this error comes from a template lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::TemplateNotFound(_))
    }
}
