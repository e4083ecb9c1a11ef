//! Session configuration (Value Object)

use crate::core::error::DomainError;
use crate::deliberation::aggregation::ScoreAggregation;
use crate::deliberation::thresholds::DeliberationThresholds;
use serde::{Deserialize, Serialize};

/// Smallest quorum a deliberation can run with
pub const MIN_VOICES_FLOOR: usize = 2;

/// Upper bound on voices in a single session
pub const MAX_VOICES_LIMIT: usize = 10;

/// Default consciousness threshold for emergence detection
pub const DEFAULT_CONSCIOUSNESS_THRESHOLD: f64 = 0.7;

/// How the session reacts to voice failures
///
/// - `Strict`: any connection or response failure aborts
/// - `Adaptive`: proceed as long as quorum holds (default)
/// - `FailFast`: abort on the first failure regardless of quorum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    Strict,
    #[default]
    Adaptive,
    FailFast,
}

impl FailureStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStrategy::Strict => "strict",
            FailureStrategy::Adaptive => "adaptive",
            FailureStrategy::FailFast => "fail_fast",
        }
    }

    /// Whether any connection failure refuses admission, even with quorum met
    pub fn connection_failure_is_fatal(&self) -> bool {
        !matches!(self, FailureStrategy::Adaptive)
    }

    /// Whether a single voice error inside a round is fatal for that round
    pub fn voice_error_is_fatal(&self) -> bool {
        !matches!(self, FailureStrategy::Adaptive)
    }

    /// Whether a fatal round error aborts the whole session
    pub fn propagates_round_errors(&self) -> bool {
        !matches!(self, FailureStrategy::Adaptive)
    }
}

impl std::fmt::Display for FailureStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FailureStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "strict" => Ok(FailureStrategy::Strict),
            "adaptive" => Ok(FailureStrategy::Adaptive),
            "fail_fast" | "failfast" => Ok(FailureStrategy::FailFast),
            other => Err(DomainError::UnknownFailureStrategy(other.to_string())),
        }
    }
}

/// Immutable description of a deliberation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Display name
    pub name: String,
    /// What the session is meant to achieve
    pub purpose: String,
    /// Minimum connected voices required to run any round (quorum)
    pub min_voices: usize,
    /// Maximum voices admitted into the session
    pub max_voices: usize,
    /// Round score at or above which emergence is flagged
    pub consciousness_threshold: f64,
    /// Share previous-round responses of other voices with each voice
    pub enable_reciprocity: bool,
    /// Compute emergence flags for rounds
    pub enable_consciousness_detection: bool,
    /// Allow the controller to insert follow-up rounds
    pub enable_dynamic_rounds: bool,
    pub failure_strategy: FailureStrategy,
    /// Hand the final result to the transcript store
    pub save_transcript: bool,
    /// How per-voice scores are folded into a round score
    pub score_aggregation: ScoreAggregation,
    /// Consensus / high-consciousness boundaries
    pub thresholds: DeliberationThresholds,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "Deliberation".to_string(),
            purpose: String::new(),
            min_voices: MIN_VOICES_FLOOR,
            max_voices: 6,
            consciousness_threshold: DEFAULT_CONSCIOUSNESS_THRESHOLD,
            enable_reciprocity: true,
            enable_consciousness_detection: true,
            enable_dynamic_rounds: false,
            failure_strategy: FailureStrategy::default(),
            save_transcript: false,
            score_aggregation: ScoreAggregation::default(),
            thresholds: DeliberationThresholds::default(),
        }
    }
}

impl SessionConfig {
    pub fn new(name: impl Into<String>, purpose: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            purpose: purpose.into(),
            ..Default::default()
        }
    }

    pub fn with_voice_range(mut self, min_voices: usize, max_voices: usize) -> Self {
        self.min_voices = min_voices;
        self.max_voices = max_voices;
        self
    }

    pub fn with_consciousness_threshold(mut self, threshold: f64) -> Self {
        self.consciousness_threshold = threshold;
        self
    }

    pub fn with_failure_strategy(mut self, strategy: FailureStrategy) -> Self {
        self.failure_strategy = strategy;
        self
    }

    pub fn with_dynamic_rounds(mut self, enabled: bool) -> Self {
        self.enable_dynamic_rounds = enabled;
        self
    }

    pub fn with_reciprocity(mut self, enabled: bool) -> Self {
        self.enable_reciprocity = enabled;
        self
    }

    pub fn with_consciousness_detection(mut self, enabled: bool) -> Self {
        self.enable_consciousness_detection = enabled;
        self
    }

    pub fn with_transcript(mut self, enabled: bool) -> Self {
        self.save_transcript = enabled;
        self
    }

    pub fn with_score_aggregation(mut self, aggregation: ScoreAggregation) -> Self {
        self.score_aggregation = aggregation;
        self
    }

    pub fn with_thresholds(mut self, thresholds: DeliberationThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Validate the configuration
    ///
    /// Enforces `2 <= min_voices <= max_voices <= MAX_VOICES_LIMIT` and that
    /// every threshold lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.min_voices < MIN_VOICES_FLOOR {
            return Err(DomainError::InvalidConfig(format!(
                "min_voices must be at least {MIN_VOICES_FLOOR}, got {}",
                self.min_voices
            )));
        }
        if self.min_voices > self.max_voices {
            return Err(DomainError::InvalidConfig(format!(
                "min_voices ({}) exceeds max_voices ({})",
                self.min_voices, self.max_voices
            )));
        }
        if self.max_voices > MAX_VOICES_LIMIT {
            return Err(DomainError::InvalidConfig(format!(
                "max_voices must be at most {MAX_VOICES_LIMIT}, got {}",
                self.max_voices
            )));
        }
        if !(0.0..=1.0).contains(&self.consciousness_threshold) {
            return Err(DomainError::InvalidConfig(format!(
                "consciousness_threshold must be within [0, 1], got {}",
                self.consciousness_threshold
            )));
        }
        self.thresholds.validate()
    }
}
