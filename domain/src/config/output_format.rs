//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for session results
///
/// This is a domain concept representing how the output should be formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every round with every voice response
    Full,
    /// Verdict, scores and insights only (default)
    #[default]
    Summary,
    /// JSON output
    Json,
}
