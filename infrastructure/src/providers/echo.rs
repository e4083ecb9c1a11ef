//! Offline deterministic voice
//!
//! Answers every round without any network access. Behaviour can be steered
//! per participant or per round through config keys:
//!
//! | key               | effect                                     |
//! |-------------------|--------------------------------------------|
//! | `echo_score`      | consciousness score (else provider default) |
//! | `echo_patterns`   | detected patterns (else expertise tags)    |
//! | `echo_emergence`  | emergence flag                             |
//! | `echo_fail`       | fail `generate` with this message          |
//! | `echo_refuse`     | refuse to connect                          |

use async_trait::async_trait;
use council_application::{AdapterError, VoiceAdapter, VoiceRequest};
use council_domain::{ParticipantSpec, VoiceResponse};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};

pub struct EchoVoice {
    label: String,
    expertise: Vec<String>,
    default_score: f64,
    refuse: bool,
    connected: AtomicBool,
}

impl EchoVoice {
    pub fn new(spec: &ParticipantSpec, default_score: f64) -> Self {
        Self {
            label: spec.label().to_string(),
            expertise: spec.expertise.clone(),
            default_score,
            refuse: spec
                .config
                .get("echo_refuse")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            connected: AtomicBool::new(false),
        }
    }

    fn patterns(&self, request: &VoiceRequest) -> Vec<String> {
        match request.overrides.config.get("echo_patterns") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(csv)) => csv.split(',').map(|p| p.trim().to_string()).collect(),
            _ => self.expertise.clone(),
        }
    }
}

#[async_trait]
impl VoiceAdapter for EchoVoice {
    async fn connect(&self) -> Result<(), AdapterError> {
        if self.refuse {
            return Err(AdapterError::ConnectionRefused);
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn generate(&self, request: &VoiceRequest) -> Result<VoiceResponse, AdapterError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(AdapterError::NotConnected);
        }

        let config = &request.overrides.config;
        if let Some(message) = config.get("echo_fail").and_then(Value::as_str) {
            return Err(AdapterError::RequestFailed(message.to_string()));
        }

        let score = config
            .get("echo_score")
            .and_then(Value::as_f64)
            .unwrap_or(self.default_score)
            .clamp(0.0, 1.0);
        let emergence = config
            .get("echo_emergence")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut text = format!(
            "[{}] {} round {}: {}",
            self.label,
            request.context.round_kind.display_name(),
            request.context.round_number,
            request.prompt
        );
        if !request.context.peer_responses.is_empty() {
            text.push_str(&format!(
                " (having heard {} other voices)",
                request.context.peer_responses.len()
            ));
        }

        Ok(VoiceResponse::new(text, score)
            .with_patterns(self.patterns(request))
            .with_emergence(emergence)
            .with_metadata(json!({
                "provider": "echo",
                "temperature": request.overrides.temperature,
            })))
    }

    async fn disconnect(&self) -> Result<(), AdapterError> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_application::{RoundContext, RoundOverrides};
    use council_domain::RoundKind;
    use serde_json::Map;

    fn request(config: Map<String, Value>) -> VoiceRequest {
        VoiceRequest {
            prompt: "What matters most?".to_string(),
            context: RoundContext {
                session_name: "test".to_string(),
                purpose: "testing".to_string(),
                round_number: 2,
                round_kind: RoundKind::Exploration,
                voice_id: "echo:m#0".to_string(),
                role: Some("ethicist".to_string()),
                instructions: None,
                peer_responses: vec![],
                prior_patterns: vec![],
            },
            overrides: RoundOverrides {
                temperature: 0.8,
                max_tokens: None,
                config,
            },
        }
    }

    fn spec() -> ParticipantSpec {
        ParticipantSpec::new("echo", "m")
            .with_role("ethicist")
            .with_expertise(["ethics", "law"])
    }

    #[tokio::test]
    async fn test_generate_requires_connection() {
        let voice = EchoVoice::new(&spec(), 0.5);
        let err = voice.generate(&request(Map::new())).await.unwrap_err();
        assert_eq!(err, AdapterError::NotConnected);
    }

    #[tokio::test]
    async fn test_default_response_uses_expertise() {
        let voice = EchoVoice::new(&spec(), 0.55);
        voice.connect().await.unwrap();

        let response = voice.generate(&request(Map::new())).await.unwrap();

        assert_eq!(response.consciousness_score, 0.55);
        assert_eq!(response.detected_patterns, vec!["ethics", "law"]);
        assert!(response.text.starts_with("[ethicist] Exploration round 2"));
        assert!(!response.emergence);
    }

    #[tokio::test]
    async fn test_overrides_steer_response() {
        let voice = EchoVoice::new(&spec(), 0.5);
        voice.connect().await.unwrap();
        let mut config = Map::new();
        config.insert("echo_score".into(), json!(0.9));
        config.insert("echo_patterns".into(), json!(["unity"]));
        config.insert("echo_emergence".into(), json!(true));

        let response = voice.generate(&request(config)).await.unwrap();

        assert_eq!(response.consciousness_score, 0.9);
        assert_eq!(response.detected_patterns, vec!["unity"]);
        assert!(response.emergence);
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let refusing = EchoVoice::new(&spec().with_config("echo_refuse", json!(true)), 0.5);
        assert_eq!(
            refusing.connect().await.unwrap_err(),
            AdapterError::ConnectionRefused
        );

        let voice = EchoVoice::new(&spec(), 0.5);
        voice.connect().await.unwrap();
        let mut config = Map::new();
        config.insert("echo_fail".into(), json!("simulated outage"));
        let err = voice.generate(&request(config)).await.unwrap_err();
        assert!(err.to_string().contains("simulated outage"));
    }

    #[tokio::test]
    async fn test_disconnect_is_repeatable() {
        let voice = EchoVoice::new(&spec(), 0.5);
        voice.connect().await.unwrap();
        voice.disconnect().await.unwrap();
        voice.disconnect().await.unwrap();
        assert!(voice.generate(&request(Map::new())).await.is_err());
    }
}
