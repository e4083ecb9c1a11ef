//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod output;
mod providers;
mod session;
mod transcript;

pub use output::{FileOutputConfig, FileOutputFormat};
pub use providers::{
    DEFAULT_ECHO_SCORE, DEFAULT_PROVIDER_TIMEOUT_SECS, FileProviderConfig, ProviderKind,
};
pub use session::FileSessionConfig;
pub use transcript::FileTranscriptConfig;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// How serious a configuration issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot work as written
    Error,
    /// The value is ignored and a default used instead
    Warning,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("{field}: unknown value '{value}' (expected one of: {expected})")]
    InvalidEnumValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("{field}: {value} is out of range ({expected})")]
    OutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    #[error("{field} cannot be empty")]
    EmptyValue { field: String },

    #[error("{0}")]
    InvalidSession(String),

    #[error("providers.{provider}: kind '{kind}' is not available in this build")]
    ProviderUnavailable { provider: String, kind: String },
}

/// A detected issue in the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub error: ConfigValidationError,
}

impl ConfigIssue {
    pub fn error(error: ConfigValidationError) -> Self {
        Self {
            severity: Severity::Error,
            error,
        }
    }

    pub fn warning(error: ConfigValidationError) -> Self {
        Self {
            severity: Severity::Warning,
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "error: {}", self.error),
            Severity::Warning => write!(f, "warning: {}", self.error),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Session overrides applied on top of the selected template
    pub session: FileSessionConfig,
    /// Named voice providers (`[providers.<name>]`)
    pub providers: BTreeMap<String, FileProviderConfig>,
    /// Transcript persistence
    pub transcript: FileTranscriptConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.session.validate();

        for (name, provider) in &self.providers {
            issues.extend(provider.validate(name));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{FailureStrategy, OutputFormat};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[session]
min_voices = 3
failure_strategy = "strict"
score_aggregation = "median"

[providers.local]
kind = "openai_compatible"
base_url = "http://localhost:11434/v1"
timeout_secs = 30

[providers.offline]
kind = "echo"
default_score = 0.6

[transcript]
directory = "/tmp/council"

[output]
format = "full"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.min_voices, Some(3));
        assert_eq!(config.session.parse_failure_strategy().0, Some(FailureStrategy::Strict));
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers["local"].parse_kind(), Some(ProviderKind::OpenAiCompatible));
        assert_eq!(config.providers["local"].timeout_secs, 30);
        assert_eq!(config.providers["offline"].default_score, 0.6);
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert_eq!(
            config.transcript.directory.as_deref(),
            Some(std::path::Path::new("/tmp/council"))
        );
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[session]
save_transcript = true
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.save_transcript, Some(true));
        assert!(config.session.min_voices.is_none());
        assert!(config.providers.is_empty());
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let toml_str = r#"
[session]
failure_strategy = "yolo"
consciousness_threshold = 1.5

[providers.broken]
kind = "carrier_pigeon"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();

        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.to_string().contains("carrier_pigeon")));
        assert!(issues.iter().any(|i| i.is_error()));
    }
}
