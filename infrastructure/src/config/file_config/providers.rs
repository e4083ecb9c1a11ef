//! Provider configuration from TOML (`[providers.<name>]` sections)

use super::{ConfigIssue, ConfigValidationError};
use serde::{Deserialize, Serialize};

/// Adapter families a provider entry can use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Offline deterministic voice
    Echo,
    /// Any chat-completions endpoint speaking the OpenAI wire format
    OpenAiCompatible,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Echo => "echo",
            ProviderKind::OpenAiCompatible => "openai_compatible",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "echo" => Some(ProviderKind::Echo),
            "openai_compatible" | "openai" => Some(ProviderKind::OpenAiCompatible),
            _ => None,
        }
    }
}

/// Raw provider entry from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// "echo" or "openai_compatible"
    pub kind: String,
    /// Base URL of the API, e.g. "https://api.openai.com/v1"
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Score reported by echo voices unless overridden per participant
    pub default_score: f64,
}

pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_ECHO_SCORE: f64 = 0.5;

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Echo.as_str().to_string(),
            base_url: None,
            api_key_env: None,
            timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            default_score: DEFAULT_ECHO_SCORE,
        }
    }
}

impl FileProviderConfig {
    pub fn parse_kind(&self) -> Option<ProviderKind> {
        ProviderKind::parse(&self.kind)
    }

    pub fn validate(&self, name: &str) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let Some(kind) = self.parse_kind() else {
            issues.push(ConfigIssue::error(ConfigValidationError::InvalidEnumValue {
                field: format!("providers.{name}.kind"),
                value: self.kind.clone(),
                expected: "echo, openai_compatible".to_string(),
            }));
            return issues;
        };

        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(ConfigValidationError::OutOfRange {
                field: format!("providers.{name}.timeout_secs"),
                value: "0".to_string(),
                expected: "at least 1".to_string(),
            }));
        }

        match kind {
            ProviderKind::Echo => {
                if !(0.0..=1.0).contains(&self.default_score) {
                    issues.push(ConfigIssue::error(ConfigValidationError::OutOfRange {
                        field: format!("providers.{name}.default_score"),
                        value: self.default_score.to_string(),
                        expected: "0.0 to 1.0".to_string(),
                    }));
                }
            }
            ProviderKind::OpenAiCompatible => {
                if self.base_url.as_deref().is_none_or(|u| u.trim().is_empty()) {
                    issues.push(ConfigIssue::error(ConfigValidationError::EmptyValue {
                        field: format!("providers.{name}.base_url"),
                    }));
                }
                if !cfg!(feature = "openai-compatible") {
                    issues.push(ConfigIssue::error(
                        ConfigValidationError::ProviderUnavailable {
                            provider: name.to_string(),
                            kind: self.kind.clone(),
                        },
                    ));
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_aliases() {
        assert_eq!(ProviderKind::parse("echo"), Some(ProviderKind::Echo));
        assert_eq!(
            ProviderKind::parse("OpenAI-Compatible"),
            Some(ProviderKind::OpenAiCompatible)
        );
        assert_eq!(ProviderKind::parse("smoke"), None);
    }

    #[test]
    fn test_default_is_valid_echo() {
        let config = FileProviderConfig::default();
        assert_eq!(config.parse_kind(), Some(ProviderKind::Echo));
        assert!(config.validate("offline").is_empty());
    }

    #[test]
    fn test_openai_requires_base_url() {
        let config = FileProviderConfig {
            kind: "openai_compatible".to_string(),
            ..Default::default()
        };
        let issues = config.validate("remote");
        assert!(
            issues
                .iter()
                .any(|i| i.to_string().contains("providers.remote.base_url"))
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = FileProviderConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate("offline").len(), 1);
    }
}
