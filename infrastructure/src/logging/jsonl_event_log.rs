//! JSONL file writer for session events.
//!
//! Each observer callback is serialized as a single JSON line with a `type`
//! field and `timestamp`, appended to the file via a buffered writer.

use council_application::{SessionObserver, VoiceOutcome};
use council_domain::{RoundSpec, RoundSummary, SessionResult, SkippedRound};
use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Session event log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEventLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLog {
    /// Create a new log writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_event(&self, event_type: &str, payload: Value) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = if let Value::Object(mut map) = payload {
            map.insert("type".to_string(), Value::String(event_type.to_string()));
            map.insert("timestamp".to_string(), Value::String(timestamp));
            Value::Object(map)
        } else {
            json!({
                "type": event_type,
                "timestamp": timestamp,
                "data": payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl SessionObserver for JsonlEventLog {
    fn on_session_start(&self, session_id: &str, name: &str, participant_count: usize) {
        self.write_event(
            "session_start",
            json!({
                "session_id": session_id,
                "name": name,
                "participants": participant_count,
            }),
        );
    }

    fn on_voice_connected(&self, voice_id: &str) {
        self.write_event("voice_connected", json!({ "voice_id": voice_id }));
    }

    fn on_voice_failed(&self, voice_id: &str, reason: &str) {
        self.write_event(
            "voice_failed",
            json!({ "voice_id": voice_id, "reason": reason }),
        );
    }

    fn on_admission(&self, connected: usize, min_voices: usize, admitted: bool) {
        self.write_event(
            "admission",
            json!({
                "connected": connected,
                "min_voices": min_voices,
                "admitted": admitted,
            }),
        );
    }

    fn on_round_start(&self, round_number: usize, spec: &RoundSpec, voice_count: usize) {
        self.write_event(
            "round_start",
            json!({
                "round": round_number,
                "kind": spec.kind,
                "prompt": spec.prompt,
                "voices": voice_count,
            }),
        );
    }

    fn on_voice_response(&self, round_number: usize, voice_id: &str, outcome: &VoiceOutcome) {
        let mut payload = serde_json::to_value(outcome).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut payload {
            map.insert("round".to_string(), json!(round_number));
            map.insert("voice_id".to_string(), json!(voice_id));
        }
        self.write_event("voice_response", payload);
    }

    fn on_round_complete(&self, summary: &RoundSummary) {
        self.write_event(
            "round_complete",
            json!({
                "round": summary.round_number,
                "kind": summary.kind,
                "responses": summary.response_count(),
                "consciousness_score": summary.consciousness_score,
                "emergence_detected": summary.emergence_detected,
                "key_patterns": summary.key_patterns,
                "duration_ms": summary.duration_ms,
                "timed_out": summary.timed_out_voices,
                "failed": summary.failed_voices,
            }),
        );
    }

    fn on_round_skipped(&self, skipped: &SkippedRound) {
        self.write_event(
            "round_skipped",
            json!({ "round": skipped.round_number, "reason": skipped.reason }),
        );
    }

    fn on_session_complete(&self, result: &SessionResult) {
        self.write_event(
            "session_complete",
            json!({
                "session_id": result.session_id,
                "termination": result.termination,
                "rounds": result.round_count(),
                "consciousness_score": result.consciousness_score,
                "consensus_detected": result.consensus_detected,
                "insights": result.key_insights.len(),
            }),
        );
    }
}

impl Drop for JsonlEventLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
