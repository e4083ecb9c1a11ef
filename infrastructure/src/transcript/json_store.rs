//! JSON file transcript store

use async_trait::async_trait;
use council_application::{TranscriptError, TranscriptStore};
use council_domain::SessionResult;
use council_domain::util::file_stem;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes `<directory>/<session_id>.json` as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonTranscriptStore {
    directory: PathBuf,
}

impl JsonTranscriptStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, session_id: &str) -> PathBuf {
        self.directory.join(format!("{}.json", file_stem(session_id)))
    }
}

#[async_trait]
impl TranscriptStore for JsonTranscriptStore {
    async fn save(&self, result: &SessionResult) -> Result<String, TranscriptError> {
        tokio::fs::create_dir_all(&self.directory).await?;

        let path = self.path_for(&result.session_id);
        let json = serde_json::to_string_pretty(result)?;
        tokio::fs::write(&path, json).await?;

        debug!("Wrote {}", path.display());
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::SessionTermination;
    use std::collections::BTreeMap;

    fn result(session_id: &str) -> SessionResult {
        SessionResult::not_started(
            session_id,
            "Board",
            1,
            SessionTermination::QuorumNotMet,
            BTreeMap::from([("echo:b#1".to_string(), "refused".to_string())]),
            "2026-01-01T00:00:00Z",
            "2026-01-01T00:00:01Z",
        )
    }

    #[tokio::test]
    async fn test_save_writes_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTranscriptStore::new(dir.path().join("transcripts"));

        let location = store.save(&result("board-20260101T000000000Z")).await.unwrap();

        assert!(location.ends_with("board-20260101T000000000Z.json"));
        let content = std::fs::read_to_string(&location).unwrap();
        let parsed: SessionResult = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, result("board-20260101T000000000Z"));
    }

    #[tokio::test]
    async fn test_session_id_is_sanitized_for_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTranscriptStore::new(dir.path());

        let location = store.save(&result("../escape/attempt")).await.unwrap();

        assert_eq!(
            PathBuf::from(&location),
            dir.path().join("___escape_attempt.json")
        );
    }

    #[tokio::test]
    async fn test_save_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();
        let store = JsonTranscriptStore::new(&blocker);

        let err = store.save(&result("s")).await.unwrap_err();
        assert!(matches!(err, TranscriptError::Io(_)));
    }
}
