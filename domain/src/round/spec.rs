//! Round specification (Value Object)

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default soft budget for a single voice to answer a round
pub const DEFAULT_DURATION_PER_VOICE: Duration = Duration::from_secs(60);

/// Kind of deliberation round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundKind {
    /// Voices state their initial positions
    Opening,
    /// Open-ended exploration of the topic
    Exploration,
    /// Voices challenge each other's positions
    Critique,
    /// Voices merge perspectives
    Synthesis,
    /// Forward-looking, imaginative round
    Vision,
    /// Voices look for agreement; drives `consensus_detected`
    Consensus,
    /// Final decision round
    Decision,
    /// Review of an artifact (code, proposal)
    Review,
    /// Voices reflect on the process itself
    Reflection,
}

impl RoundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundKind::Opening => "opening",
            RoundKind::Exploration => "exploration",
            RoundKind::Critique => "critique",
            RoundKind::Synthesis => "synthesis",
            RoundKind::Vision => "vision",
            RoundKind::Consensus => "consensus",
            RoundKind::Decision => "decision",
            RoundKind::Review => "review",
            RoundKind::Reflection => "reflection",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RoundKind::Opening => "Opening",
            RoundKind::Exploration => "Exploration",
            RoundKind::Critique => "Critique",
            RoundKind::Synthesis => "Synthesis",
            RoundKind::Vision => "Vision",
            RoundKind::Consensus => "Consensus",
            RoundKind::Decision => "Decision",
            RoundKind::Review => "Review",
            RoundKind::Reflection => "Reflection",
        }
    }

    /// Rounds that close a deliberation and should not be followed by
    /// dynamically inserted rounds
    pub fn is_concluding(&self) -> bool {
        matches!(self, RoundKind::Consensus | RoundKind::Decision)
    }
}

impl std::fmt::Display for RoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for RoundKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "opening" => RoundKind::Opening,
            "exploration" => RoundKind::Exploration,
            "critique" => RoundKind::Critique,
            "synthesis" => RoundKind::Synthesis,
            "vision" => RoundKind::Vision,
            "consensus" => RoundKind::Consensus,
            "decision" => RoundKind::Decision,
            "review" => RoundKind::Review,
            "reflection" => RoundKind::Reflection,
            other => return Err(DomainError::UnknownRoundKind(other.to_string())),
        })
    }
}

/// Parameters of one round; immutable once the round begins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSpec {
    pub kind: RoundKind,
    pub prompt: String,
    /// Soft per-voice budget; late voices are non-responses
    #[serde(with = "crate::core::duration", default = "default_duration")]
    pub duration_per_voice: Duration,
    /// Fail the round if any live voice does not answer
    #[serde(default)]
    pub require_all_voices: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Overrides keyed by voice id or role label
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub voice_overrides: BTreeMap<String, Map<String, Value>>,
}

fn default_duration() -> Duration {
    DEFAULT_DURATION_PER_VOICE
}

impl RoundSpec {
    pub fn new(kind: RoundKind, prompt: impl Into<String>) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
            duration_per_voice: DEFAULT_DURATION_PER_VOICE,
            require_all_voices: false,
            max_tokens: None,
            temperature: None,
            voice_overrides: BTreeMap::new(),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_per_voice = duration;
        self
    }

    pub fn requiring_all_voices(mut self) -> Self {
        self.require_all_voices = true;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_voice_override(
        mut self,
        voice: impl Into<String>,
        key: impl Into<String>,
        value: Value,
    ) -> Self {
        self.voice_overrides
            .entry(voice.into())
            .or_default()
            .insert(key.into(), value);
        self
    }

    /// Overrides for a voice: role-level entries first, voice-id entries win
    pub fn overrides_for(&self, voice_id: &str, role: Option<&str>) -> Map<String, Value> {
        let mut merged = Map::new();
        if let Some(role) = role
            && let Some(by_role) = self.voice_overrides.get(role)
        {
            merged.extend(by_role.clone());
        }
        if let Some(by_id) = self.voice_overrides.get(voice_id) {
            merged.extend(by_id.clone());
        }
        merged
    }
}
