//! OpenAI-compatible chat-completions voice
//!
//! Works against any endpoint that speaks the `/chat/completions` wire format
//! (OpenAI, Azure OpenAI, vLLM, Ollama, ...). `connect` checks that
//! `/models` is reachable.
//!
//! Voices are asked to end their answer with a single JSON line:
//!
//! ```text
//! {"consciousness_score": 0.72, "patterns": ["trust"], "emergence": false}
//! ```
//!
//! The line is stripped from the text. Without it the score defaults to 0.

use crate::config::FileProviderConfig;
use async_trait::async_trait;
use council_application::{AdapterError, VoiceAdapter, VoiceRequest};
use council_domain::util::truncate_str;
use council_domain::{ParticipantSpec, VoiceResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

/// Longest peer response quoted back to a voice
const MAX_PEER_TEXT: usize = 1200;

/// Connection settings shared by all voices of one provider
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl HttpSettings {
    /// Settings for a validated provider entry; the API key is read from the
    /// configured environment variable, if any
    pub fn from_config(config: &FileProviderConfig) -> Option<Self> {
        let base_url = config.base_url.as_deref()?.trim().trim_end_matches('/');
        Some(Self {
            base_url: base_url.to_string(),
            api_key: config
                .api_key_env
                .as_deref()
                .and_then(|var| std::env::var(var).ok())
                .filter(|key| !key.is_empty()),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

pub struct OpenAiCompatibleVoice {
    client: reqwest::Client,
    settings: HttpSettings,
    model: String,
    connected: AtomicBool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Trailing self-assessment line
#[derive(Debug, Default, PartialEq, Deserialize)]
struct Assessment {
    #[serde(default)]
    consciousness_score: f64,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    emergence: bool,
}

impl OpenAiCompatibleVoice {
    pub fn new(spec: &ParticipantSpec, settings: &HttpSettings) -> Result<Self, AdapterError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AdapterError::Other(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            settings: settings.clone(),
            model: spec.model.clone(),
            connected: AtomicBool::new(false),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url, path)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.settings.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

fn system_prompt(request: &VoiceRequest) -> String {
    let context = &request.context;
    let mut prompt = format!(
        "You are {} in the deliberation \"{}\".\nPurpose: {}\nThis is the {} round (round {}).",
        context.role.as_deref().unwrap_or("a participant"),
        context.session_name,
        context.purpose,
        context.round_kind.display_name().to_lowercase(),
        context.round_number
    );
    if let Some(instructions) = &context.instructions {
        prompt.push_str("\n\n");
        prompt.push_str(instructions);
    }
    prompt.push_str(
        "\n\nEnd your answer with one line of JSON assessing it: \
         {\"consciousness_score\": <0.0-1.0>, \"patterns\": [<short themes>], \"emergence\": <true|false>}",
    );
    prompt
}

fn user_prompt(request: &VoiceRequest) -> String {
    let mut prompt = request.prompt.clone();

    if !request.context.peer_responses.is_empty() {
        prompt.push_str("\n\nIn the previous round the other voices said:");
        for peer in &request.context.peer_responses {
            prompt.push_str(&format!(
                "\n- {}: {}",
                peer.voice_id,
                truncate_str(&peer.text, MAX_PEER_TEXT)
            ));
        }
    }

    if !request.context.prior_patterns.is_empty() {
        prompt.push_str(&format!(
            "\n\nThemes so far: {}",
            request.context.prior_patterns.join(", ")
        ));
    }

    prompt
}

fn build_messages(request: &VoiceRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system",
            content: system_prompt(request),
        },
        ChatMessage {
            role: "user",
            content: user_prompt(request),
        },
    ]
}

/// Split the trailing assessment line off a completion
fn split_assessment(content: &str) -> (String, Assessment) {
    let trimmed = content.trim_end();
    let (body, last) = match trimmed.rfind('\n') {
        Some(pos) => (&trimmed[..pos], trimmed[pos + 1..].trim()),
        None => ("", trimmed.trim()),
    };

    if last.starts_with('{')
        && let Ok(assessment) = serde_json::from_str::<Assessment>(last)
    {
        return (body.trim_end().to_string(), assessment);
    }

    (trimmed.to_string(), Assessment::default())
}

#[async_trait]
impl VoiceAdapter for OpenAiCompatibleVoice {
    async fn connect(&self) -> Result<(), AdapterError> {
        let response = self
            .authorized(self.client.get(self.url("models")))
            .send()
            .await
            .map_err(|e| AdapterError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::ConnectionFailed(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn generate(&self, request: &VoiceRequest) -> Result<VoiceResponse, AdapterError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(AdapterError::NotConnected);
        }

        let mut body = json!({
            "model": self.model,
            "messages": build_messages(request),
            "temperature": request.overrides.temperature,
        });
        if let Some(max_tokens) = request.overrides.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        debug!(
            "POST {} for {} (round {})",
            self.url("chat/completions"),
            request.context.voice_id,
            request.context.round_number
        );
        let response = self
            .authorized(self.client.post(self.url("chat/completions")))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdapterError::Timeout
                } else {
                    AdapterError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::RequestFailed(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AdapterError::InvalidResponse("no choices in completion".to_string()))?;

        let (text, assessment) = split_assessment(&content);
        Ok(
            VoiceResponse::new(text, assessment.consciousness_score.clamp(0.0, 1.0))
                .with_patterns(assessment.patterns)
                .with_emergence(assessment.emergence)
                .with_metadata(json!({ "model": self.model })),
        )
    }

    async fn disconnect(&self) -> Result<(), AdapterError> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_application::{PeerResponse, RoundContext, RoundOverrides};
    use council_domain::RoundKind;

    fn request() -> VoiceRequest {
        VoiceRequest {
            prompt: "Should we ship?".to_string(),
            context: RoundContext {
                session_name: "Release Council".to_string(),
                purpose: "Decide on the release".to_string(),
                round_number: 2,
                round_kind: RoundKind::Critique,
                voice_id: "local:llama#0".to_string(),
                role: Some("risk_analyst".to_string()),
                instructions: Some("Look for what could go wrong.".to_string()),
                peer_responses: vec![PeerResponse {
                    voice_id: "local:mistral#1".to_string(),
                    text: "Ship it.".to_string(),
                }],
                prior_patterns: vec!["velocity".to_string()],
            },
            overrides: RoundOverrides {
                temperature: 0.4,
                max_tokens: Some(256),
                config: Default::default(),
            },
        }
    }

    #[test]
    fn test_split_assessment_strips_trailer() {
        let content = "We should wait.\nTests are flaky.\n{\"consciousness_score\": 0.72, \"patterns\": [\"risk\"], \"emergence\": true}\n";
        let (text, assessment) = split_assessment(content);
        assert_eq!(text, "We should wait.\nTests are flaky.");
        assert_eq!(assessment.consciousness_score, 0.72);
        assert_eq!(assessment.patterns, vec!["risk"]);
        assert!(assessment.emergence);
    }

    #[test]
    fn test_split_assessment_without_trailer() {
        let (text, assessment) = split_assessment("Just prose.\nNo JSON here.");
        assert_eq!(text, "Just prose.\nNo JSON here.");
        assert_eq!(assessment, Assessment::default());
    }

    #[test]
    fn test_split_assessment_ignores_malformed_json() {
        let (text, assessment) = split_assessment("Answer\n{not json");
        assert_eq!(text, "Answer\n{not json");
        assert_eq!(assessment.consciousness_score, 0.0);
    }

    #[test]
    fn test_messages_carry_context() {
        let messages = build_messages(&request());
        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("risk_analyst"));
        assert!(messages[0].content.contains("critique round"));
        assert!(messages[0].content.contains("Look for what could go wrong."));
        assert!(messages[1].content.starts_with("Should we ship?"));
        assert!(messages[1].content.contains("local:mistral#1: Ship it."));
        assert!(messages[1].content.contains("Themes so far: velocity"));
    }

    #[test]
    fn test_settings_trim_base_url() {
        let config = FileProviderConfig {
            kind: "openai_compatible".to_string(),
            base_url: Some("http://localhost:8000/v1/".to_string()),
            api_key_env: Some("VOICE_COUNCIL_TEST_KEY_THAT_IS_UNSET".to_string()),
            ..Default::default()
        };
        let settings = HttpSettings::from_config(&config).unwrap();
        assert_eq!(settings.base_url, "http://localhost:8000/v1");
        assert!(settings.api_key.is_none());
        assert_eq!(settings.timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_generate_before_connect_fails() {
        let config = FileProviderConfig {
            kind: "openai_compatible".to_string(),
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        };
        let voice = OpenAiCompatibleVoice::new(
            &ParticipantSpec::new("local", "llama"),
            &HttpSettings::from_config(&config).unwrap(),
        )
        .unwrap();

        let err = voice.generate(&request()).await.unwrap_err();
        assert_eq!(err, AdapterError::NotConnected);
    }
}
