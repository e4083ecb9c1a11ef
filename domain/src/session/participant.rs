//! Participant specification (Value Object)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default sampling temperature for a voice
pub const DEFAULT_TEMPERATURE: f64 = 0.8;

/// One configured voice, created by the caller or a template
///
/// Never mutated after the session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    /// Provider identifier used to look up the adapter factory (e.g. "openai")
    pub provider: String,
    /// Model identifier understood by that provider
    pub model: String,
    /// Role / persona label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Instruction text for the voice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Free-form description of the quality this voice brings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    /// Provider-specific overrides
    #[serde(default)]
    pub config: Map<String, Value>,
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

impl ParticipantSpec {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            role: None,
            instructions: None,
            temperature: DEFAULT_TEMPERATURE,
            quality: None,
            expertise: Vec::new(),
            config: Map::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    pub fn with_expertise<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expertise = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    /// Stable identifier for the spec at `index` in the configured voice list
    ///
    /// Used both as the live voice id and as the key of the failed-voice map.
    pub fn voice_id(&self, index: usize) -> String {
        format!("{}:{}#{}", self.provider, self.model, index)
    }

    /// Human-readable label: role if present, otherwise the model
    pub fn label(&self) -> &str {
        self.role.as_deref().unwrap_or(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let spec = ParticipantSpec::new("openai", "gpt-4o");
        assert_eq!(spec.temperature, DEFAULT_TEMPERATURE);
        assert!(spec.role.is_none());
        assert!(spec.expertise.is_empty());
        assert_eq!(spec.label(), "gpt-4o");
    }

    #[test]
    fn test_voice_id_includes_index() {
        let spec = ParticipantSpec::new("anthropic", "claude").with_role("sage");
        assert_eq!(spec.voice_id(0), "anthropic:claude#0");
        assert_eq!(spec.voice_id(3), "anthropic:claude#3");
        assert_eq!(spec.label(), "sage");
    }

    #[test]
    fn test_deserialize_minimal() {
        let spec: ParticipantSpec =
            serde_json::from_str(r#"{"provider":"echo","model":"mirror"}"#).unwrap();
        assert_eq!(spec.temperature, DEFAULT_TEMPERATURE);
        assert!(spec.config.is_empty());
    }
}
