//! Transcript configuration from TOML (`[transcript]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTranscriptConfig {
    /// Where transcripts are written; defaults to the platform data dir
    pub directory: Option<PathBuf>,
}

impl FileTranscriptConfig {
    /// Configured directory, else `$XDG_DATA_HOME/voice-council/transcripts`,
    /// else `./.council/transcripts`
    pub fn resolve_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("voice-council").join("transcripts"))
                .unwrap_or_else(|| PathBuf::from(".council").join("transcripts"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_directory_wins() {
        let config = FileTranscriptConfig {
            directory: Some(PathBuf::from("/srv/transcripts")),
        };
        assert_eq!(config.resolve_directory(), PathBuf::from("/srv/transcripts"));
    }

    #[test]
    fn test_default_directory_is_namespaced() {
        let dir = FileTranscriptConfig::default().resolve_directory();
        assert!(dir.ends_with("transcripts"));
    }
}
