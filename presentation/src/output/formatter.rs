//! Output formatter trait

use council_domain::{OutputFormat, SessionResult};

/// Trait for formatting session results
pub trait OutputFormatter {
    /// Every round with every voice response
    fn format(&self, result: &SessionResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &SessionResult) -> String;

    /// Verdict, scores and insights only
    fn format_summary(&self, result: &SessionResult) -> String;

    fn render(&self, result: &SessionResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(result),
            OutputFormat::Summary => self.format_summary(result),
            OutputFormat::Json => self.format_json(result),
        }
    }
}
