//! Scripted voices shared by the use case tests

use crate::ports::voice_adapter::{AdapterError, AdapterFactory, VoiceAdapter, VoiceRequest};
use async_trait::async_trait;
use council_domain::{ParticipantSpec, VoiceResponse};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What a scripted voice does in a given round
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Score(f64),
    Patterns(f64, Vec<&'static str>),
    Emergent(f64),
    Fail(&'static str),
    Hang,
}

pub(crate) struct ScriptedVoice {
    refuse_connect: bool,
    /// One reply per round; the last one repeats
    replies: Vec<Reply>,
    pub connects: AtomicUsize,
    pub disconnects: AtomicUsize,
    pub requests: Mutex<Vec<VoiceRequest>>,
}

impl ScriptedVoice {
    pub fn replying(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            refuse_connect: false,
            replies,
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn scoring(score: f64) -> Arc<Self> {
        Self::replying(vec![Reply::Score(score)])
    }

    pub fn refusing() -> Arc<Self> {
        Arc::new(Self {
            refuse_connect: true,
            replies: vec![],
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<VoiceRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl VoiceAdapter for ScriptedVoice {
    async fn connect(&self) -> Result<(), AdapterError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.refuse_connect {
            Err(AdapterError::ConnectionRefused)
        } else {
            Ok(())
        }
    }

    async fn generate(&self, request: &VoiceRequest) -> Result<VoiceResponse, AdapterError> {
        self.requests.lock().unwrap().push(request.clone());
        let index = request.context.round_number.saturating_sub(1);
        let reply = self
            .replies
            .get(index)
            .or(self.replies.last())
            .cloned()
            .unwrap_or(Reply::Score(0.0));
        let text = format!(
            "{} answers round {}",
            request.context.voice_id, request.context.round_number
        );

        match reply {
            Reply::Score(score) => Ok(VoiceResponse::new(text, score)),
            Reply::Patterns(score, patterns) => {
                Ok(VoiceResponse::new(text, score).with_patterns(patterns))
            }
            Reply::Emergent(score) => Ok(VoiceResponse::new(text, score).with_emergence(true)),
            Reply::Fail(reason) => Err(AdapterError::RequestFailed(reason.to_string())),
            Reply::Hang => futures::future::pending().await,
        }
    }

    async fn disconnect(&self) -> Result<(), AdapterError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out scripted voices by model name
#[derive(Default)]
pub(crate) struct ScriptedFactory {
    voices: BTreeMap<String, Arc<ScriptedVoice>>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voice(mut self, model: &str, voice: Arc<ScriptedVoice>) -> Self {
        self.voices.insert(model.to_string(), voice);
        self
    }
}

impl AdapterFactory for ScriptedFactory {
    fn create_adapter(
        &self,
        spec: &ParticipantSpec,
    ) -> Result<Arc<dyn VoiceAdapter>, AdapterError> {
        self.voices
            .get(&spec.model)
            .map(|v| Arc::clone(v) as Arc<dyn VoiceAdapter>)
            .ok_or_else(|| AdapterError::UnknownProvider(spec.provider.clone()))
    }
}

/// Participant specs for the given model names, all on the `mock` provider
pub(crate) fn participants(models: &[&str]) -> Vec<ParticipantSpec> {
    models
        .iter()
        .map(|m| ParticipantSpec::new("mock", *m))
        .collect()
}
