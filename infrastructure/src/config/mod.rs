//! Configuration file loading for voice-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./council.toml` or `./.council.toml`
//! 3. Global: `$XDG_CONFIG_HOME/voice-council/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigValidationError, DEFAULT_ECHO_SCORE, DEFAULT_PROVIDER_TIMEOUT_SECS,
    FileConfig, FileOutputConfig, FileOutputFormat, FileProviderConfig, FileSessionConfig,
    FileTranscriptConfig, ProviderKind, Severity,
};
pub use loader::ConfigLoader;
