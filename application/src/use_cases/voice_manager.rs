//! Voice manager
//!
//! Owns the live voice set of one session: connects participants through the
//! [`AdapterFactory`], records connection failures, and tears everything down
//! at the end.

use crate::ports::session_observer::{NoObserver, SessionObserver};
use crate::ports::voice_adapter::{AdapterError, AdapterFactory, VoiceAdapter};
use council_domain::{FailureStrategy, ParticipantSpec, SessionConfig};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound for a single `connect` call
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// A connected participant
pub struct LiveVoice {
    pub id: String,
    pub spec: ParticipantSpec,
    pub adapter: Arc<dyn VoiceAdapter>,
    /// Set once a round-level call errored; the voice sits out later rounds
    pub failure: Option<String>,
}

impl LiveVoice {
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

impl std::fmt::Debug for LiveVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveVoice")
            .field("id", &self.id)
            .field("provider", &self.spec.provider)
            .field("model", &self.spec.model)
            .field("failure", &self.failure)
            .finish()
    }
}

pub struct VoiceManager {
    factory: Arc<dyn AdapterFactory>,
    active_voices: BTreeMap<String, LiveVoice>,
    failed_voices: BTreeMap<String, String>,
    connect_timeout: Duration,
}

impl VoiceManager {
    pub fn new(factory: Arc<dyn AdapterFactory>) -> Self {
        Self {
            factory,
            active_voices: BTreeMap::new(),
            failed_voices: BTreeMap::new(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Connect participants, returning how many are live
    pub async fn gather_voices(
        &mut self,
        specs: &[ParticipantSpec],
        config: &SessionConfig,
    ) -> usize {
        self.gather_voices_with_observer(specs, config, &NoObserver)
            .await
    }

    /// Connect participants with progress callbacks
    ///
    /// Individual failures are recorded in `failed_voices`, never returned.
    /// Connecting stops once `max_voices` are live, or at the first failure
    /// under [`FailureStrategy::FailFast`].
    pub async fn gather_voices_with_observer(
        &mut self,
        specs: &[ParticipantSpec],
        config: &SessionConfig,
        observer: &dyn SessionObserver,
    ) -> usize {
        info!("Gathering up to {} of {} voices", config.max_voices, specs.len());

        for (index, spec) in specs.iter().enumerate() {
            if self.active_voices.len() >= config.max_voices {
                debug!(
                    "Voice limit {} reached, leaving {} specs unconnected",
                    config.max_voices,
                    specs.len() - index
                );
                break;
            }

            let id = spec.voice_id(index);
            match self.connect_one(spec).await {
                Ok(adapter) => {
                    info!("Voice {} connected", id);
                    observer.on_voice_connected(&id);
                    self.active_voices.insert(
                        id.clone(),
                        LiveVoice {
                            id,
                            spec: spec.clone(),
                            adapter,
                            failure: None,
                        },
                    );
                }
                Err(e) => {
                    warn!("Voice {} failed to connect: {}", id, e);
                    let reason = e.to_string();
                    observer.on_voice_failed(&id, &reason);
                    self.failed_voices.insert(id, reason);

                    if config.failure_strategy == FailureStrategy::FailFast {
                        info!("fail_fast: stopping voice gathering");
                        break;
                    }
                }
            }
        }

        self.active_voices.len()
    }

    async fn connect_one(
        &self,
        spec: &ParticipantSpec,
    ) -> Result<Arc<dyn VoiceAdapter>, AdapterError> {
        let adapter = self.factory.create_adapter(spec)?;
        match tokio::time::timeout(self.connect_timeout, adapter.connect()).await {
            Ok(Ok(())) => Ok(adapter),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(AdapterError::Timeout),
        }
    }

    /// Exclude a voice from subsequent rounds
    ///
    /// The voice stays in `active_voices` so it is still disconnected at
    /// teardown.
    pub fn mark_failed(&mut self, voice_id: &str, reason: impl Into<String>) {
        if let Some(voice) = self.active_voices.get_mut(voice_id)
            && voice.failure.is_none()
        {
            let reason = reason.into();
            debug!("Voice {} marked failed: {}", voice_id, reason);
            voice.failure = Some(reason);
        }
    }

    /// Voices still taking part, in id order
    pub fn live_voices(&self) -> Vec<&LiveVoice> {
        self.active_voices
            .values()
            .filter(|v| !v.is_failed())
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.active_voices.values().filter(|v| !v.is_failed()).count()
    }

    pub fn active_voices(&self) -> &BTreeMap<String, LiveVoice> {
        &self.active_voices
    }

    pub fn failed_voices(&self) -> &BTreeMap<String, String> {
        &self.failed_voices
    }

    /// Disconnect every voice concurrently and clear the live set
    ///
    /// Per-voice errors are logged and suppressed. Calling this again is a
    /// no-op.
    pub async fn disconnect_all(&mut self) {
        if self.active_voices.is_empty() {
            return;
        }

        let voices = std::mem::take(&mut self.active_voices);
        info!("Disconnecting {} voices", voices.len());

        let results = futures::future::join_all(voices.values().map(|voice| async move {
            (voice.id.as_str(), voice.adapter.disconnect().await)
        }))
        .await;

        for (id, result) in results {
            if let Err(e) = result {
                warn!("Voice {} failed to disconnect cleanly: {}", id, e);
            }
        }
    }
}
