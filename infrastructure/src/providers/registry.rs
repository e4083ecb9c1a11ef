//! Provider registry
//!
//! A provider-name → constructor map implementing the
//! [`AdapterFactory`] port. Resolution order for a participant's provider:
//!
//! 1. a constructor registered under that exact name
//! 2. the fallback provider, if one is set
//! 3. `AdapterError::UnknownProvider`

use super::echo::EchoVoice;
use crate::config::{
    ConfigIssue, DEFAULT_ECHO_SCORE, FileConfig, FileProviderConfig, ProviderKind,
};
use council_application::{AdapterError, AdapterFactory, VoiceAdapter};
use council_domain::ParticipantSpec;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds an adapter for one participant
pub type VoiceConstructor =
    Arc<dyn Fn(&ParticipantSpec) -> Result<Arc<dyn VoiceAdapter>, AdapterError> + Send + Sync>;

/// Name under which the offline echo provider is always available
pub const ECHO_PROVIDER: &str = "echo";

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    constructors: BTreeMap<String, VoiceConstructor>,
    fallback: Option<String>,
}

impl ProviderRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with only the built-in echo provider
    pub fn with_echo() -> Self {
        let mut registry = Self::new();
        registry.register(ECHO_PROVIDER, echo_constructor(DEFAULT_ECHO_SCORE));
        registry
    }

    /// Echo plus every valid `[providers.<name>]` entry
    ///
    /// Invalid entries are skipped here; `FileConfig::validate` reports them.
    pub fn from_config(config: &FileConfig) -> Self {
        let mut registry = Self::with_echo();
        for (name, provider) in &config.providers {
            match constructor_for(name, provider) {
                Some(constructor) => registry.register(name, constructor),
                None => warn!("Skipping misconfigured provider '{}'", name),
            }
        }
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, constructor: VoiceConstructor) {
        let name = name.into();
        debug!("Registering voice provider '{}'", name);
        self.constructors.insert(name, constructor);
    }

    /// Route unregistered providers to `name`
    pub fn with_fallback(mut self, name: impl Into<String>) -> Self {
        self.fallback = Some(name.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered provider names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    fn resolve(&self, provider: &str) -> Result<&VoiceConstructor, AdapterError> {
        if let Some(constructor) = self.constructors.get(provider) {
            return Ok(constructor);
        }

        if let Some(fallback) = &self.fallback
            && let Some(constructor) = self.constructors.get(fallback)
        {
            debug!("Provider '{}' routed to fallback '{}'", provider, fallback);
            return Ok(constructor);
        }

        Err(AdapterError::UnknownProvider(provider.to_string()))
    }
}

impl AdapterFactory for ProviderRegistry {
    fn create_adapter(
        &self,
        spec: &ParticipantSpec,
    ) -> Result<Arc<dyn VoiceAdapter>, AdapterError> {
        let constructor = self.resolve(&spec.provider)?;
        constructor(spec)
    }
}

fn echo_constructor(default_score: f64) -> VoiceConstructor {
    Arc::new(
        move |spec: &ParticipantSpec| -> Result<Arc<dyn VoiceAdapter>, AdapterError> {
            Ok(Arc::new(EchoVoice::new(spec, default_score)))
        },
    )
}

fn constructor_for(name: &str, provider: &FileProviderConfig) -> Option<VoiceConstructor> {
    if provider.validate(name).iter().any(ConfigIssue::is_error) {
        return None;
    }

    match provider.parse_kind()? {
        ProviderKind::Echo => Some(echo_constructor(provider.default_score)),
        #[cfg(feature = "openai-compatible")]
        ProviderKind::OpenAiCompatible => {
            use super::openai_compatible::{HttpSettings, OpenAiCompatibleVoice};

            let settings = HttpSettings::from_config(provider)?;
            Some(Arc::new(
                move |spec: &ParticipantSpec| -> Result<Arc<dyn VoiceAdapter>, AdapterError> {
                    Ok(Arc::new(OpenAiCompatibleVoice::new(spec, &settings)?))
                },
            ))
        }
        #[cfg(not(feature = "openai-compatible"))]
        ProviderKind::OpenAiCompatible => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use council_application::VoiceRequest;
    use council_domain::VoiceResponse;

    struct MockVoice;

    #[async_trait]
    impl VoiceAdapter for MockVoice {
        async fn connect(&self) -> Result<(), AdapterError> {
            Ok(())
        }
        async fn generate(&self, _request: &VoiceRequest) -> Result<VoiceResponse, AdapterError> {
            Ok(VoiceResponse::new("mock", 1.0))
        }
        async fn disconnect(&self) -> Result<(), AdapterError> {
            Ok(())
        }
    }

    fn mock_constructor() -> VoiceConstructor {
        Arc::new(
            |_spec: &ParticipantSpec| -> Result<Arc<dyn VoiceAdapter>, AdapterError> {
                Ok(Arc::new(MockVoice))
            },
        )
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        let registry = ProviderRegistry::with_echo();
        let err = registry
            .create_adapter(&ParticipantSpec::new("anthropic", "claude"))
            .err()
            .unwrap();
        assert_eq!(err, AdapterError::UnknownProvider("anthropic".to_string()));
    }

    #[test]
    fn test_fallback_routes_unregistered_providers() {
        let registry = ProviderRegistry::with_echo().with_fallback(ECHO_PROVIDER);
        assert!(
            registry
                .create_adapter(&ParticipantSpec::new("anthropic", "claude"))
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_registered_constructor_is_used() {
        let mut registry = ProviderRegistry::new();
        registry.register("mock", mock_constructor());

        let adapter = registry
            .create_adapter(&ParticipantSpec::new("mock", "m"))
            .unwrap();
        adapter.connect().await.unwrap();

        assert_eq!(registry.names(), vec!["mock"]);
    }

    #[test]
    fn test_from_config_registers_valid_providers_only() {
        let config: FileConfig = toml::from_str(
            r#"
[providers.offline]
kind = "echo"
default_score = 0.9

[providers.broken]
kind = "telegraph"
"#,
        )
        .unwrap();

        let registry = ProviderRegistry::from_config(&config);

        assert!(registry.contains("echo"));
        assert!(registry.contains("offline"));
        assert!(!registry.contains("broken"));
    }

    #[tokio::test]
    async fn test_configured_echo_uses_its_default_score() {
        let config: FileConfig =
            toml::from_str("[providers.offline]\nkind = \"echo\"\ndefault_score = 0.9\n").unwrap();
        let registry = ProviderRegistry::from_config(&config);

        let adapter = registry
            .create_adapter(&ParticipantSpec::new("offline", "m"))
            .unwrap();
        adapter.connect().await.unwrap();
        let request = VoiceRequest {
            prompt: "hi".to_string(),
            context: council_application::RoundContext {
                session_name: "s".to_string(),
                purpose: "p".to_string(),
                round_number: 1,
                round_kind: council_domain::RoundKind::Opening,
                voice_id: "offline:m#0".to_string(),
                role: None,
                instructions: None,
                peer_responses: vec![],
                prior_patterns: vec![],
            },
            overrides: council_application::RoundOverrides {
                temperature: 0.8,
                max_tokens: None,
                config: Default::default(),
            },
        };

        let response = adapter.generate(&request).await.unwrap();
        assert_eq!(response.consciousness_score, 0.9);
    }
}
