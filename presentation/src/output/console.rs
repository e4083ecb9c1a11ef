//! Console output formatter for session results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_domain::{RoundSummary, SessionResult};

/// Formats session results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete session result
    pub fn format(result: &SessionResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Council: {}", result.session_name)));
        output.push('\n');
        output.push_str(&Self::overview(result));

        for round in &result.rounds_completed {
            output.push_str(&Self::section_header(&format!(
                "Round {}: {}",
                round.round_number, round.kind
            )));
            output.push_str(&format!("{} {}\n", "Prompt:".cyan().bold(), round.prompt));
            output.push_str(&Self::round_line(round));

            let mut responses: Vec<_> = round.responses.values().collect();
            responses.sort_by_key(|r| r.sequence);
            for response in responses {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!(
                        "── {} ({:.2}, {} ms) ──",
                        response.voice_id, response.consciousness_score, response.latency_ms
                    )
                    .yellow()
                    .bold(),
                    Self::indent(&response.response.text, "  ")
                ));
            }

            for voice in &round.timed_out_voices {
                output.push_str(&format!(
                    "\n{}\n",
                    format!("── {voice} timed out ──").red().bold()
                ));
            }
            for (voice, reason) in &round.failed_voices {
                output.push_str(&format!(
                    "\n{}\nError: {}\n",
                    format!("── {voice} ──").red().bold(),
                    reason
                ));
            }
        }

        for skipped in &result.skipped_rounds {
            output.push_str(&format!(
                "\n{} round {}: {}\n",
                "Skipped".yellow().bold(),
                skipped.round_number,
                skipped.reason
            ));
        }

        output.push_str(&Self::verdict(result));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &SessionResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the verdict only (concise output)
    pub fn format_summary(result: &SessionResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            format!("=== {} ===", result.session_name).cyan().bold()
        ));
        output.push_str(&Self::overview(result));

        if !result.rounds_completed.is_empty() {
            output.push('\n');
            for round in &result.rounds_completed {
                output.push_str(&format!(
                    "  {:>2}. {:<12} {}\n",
                    round.round_number,
                    round.kind.display_name(),
                    Self::round_line(round).trim_end()
                ));
            }
        }

        output.push_str(&Self::verdict(result));
        output
    }

    fn overview(result: &SessionResult) -> String {
        let mut output = format!(
            "{} {}\n{} {} ({})\n",
            "Session:".cyan().bold(),
            result.session_id,
            "Voices:".cyan().bold(),
            result.voice_count,
            result.termination
        );

        if !result.connection_failures.is_empty() {
            output.push_str(&format!("{}\n", "Connection failures:".red().bold()));
            for (voice, reason) in &result.connection_failures {
                output.push_str(&format!("  x {voice}: {reason}\n"));
            }
        }

        output
    }

    fn round_line(round: &RoundSummary) -> String {
        let emergence = if round.emergence_detected {
            format!(" {}", "emergence".magenta().bold())
        } else {
            String::new()
        };
        format!(
            "score {:.2}, {} responses{}\n",
            round.consciousness_score,
            round.response_count(),
            emergence
        )
    }

    fn verdict(result: &SessionResult) -> String {
        let mut output = String::new();

        if !result.termination.is_completed() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Not convened:".red().bold(),
                result.termination
            ));
            return output;
        }

        output.push_str(&format!(
            "\n{} {:.2}\n",
            "Consciousness score:".cyan().bold(),
            result.consciousness_score
        ));
        let consensus = if result.consensus_detected {
            "reached".green().bold()
        } else {
            "not reached".yellow().bold()
        };
        output.push_str(&format!("{} {}\n", "Consensus:".cyan().bold(), consensus));

        if !result.key_insights.is_empty() {
            output.push_str(&format!("\n{}\n", "Key Insights:".cyan().bold()));
            for insight in &result.key_insights {
                output.push_str(&format!("  * {}\n", insight));
            }
        }

        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &SessionResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &SessionResult) -> String {
        Self::format_json(result)
    }

    fn format_summary(&self, result: &SessionResult) -> String {
        Self::format_summary(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{
        EmergencePolicy, OutputFormat, RoundKind, RoundResult, RoundSpec, ScoreAggregation,
        SessionTermination, VoiceResponse,
    };
    use std::collections::BTreeMap;

    fn completed() -> SessionResult {
        let spec = RoundSpec::new(RoundKind::Opening, "Open the floor");
        let responses = BTreeMap::from([(
            "echo:a#0".to_string(),
            RoundResult::new(
                "echo:a#0",
                1,
                VoiceResponse::new("First thoughts\non two lines", 0.85).with_patterns(["trust"]),
                14,
                0,
            ),
        )]);
        let round = RoundSummary::from_responses(
            1,
            &spec,
            responses,
            ScoreAggregation::Mean,
            EmergencePolicy {
                enabled: true,
                threshold: 0.9,
            },
            20,
        )
        .with_diagnostics(
            vec!["echo:b#1".to_string()],
            BTreeMap::from([("echo:c#2".to_string(), "Request failed: boom".to_string())]),
        );

        SessionResult {
            session_id: "board-20260101T000000000Z".to_string(),
            session_name: "Board".to_string(),
            voice_count: 3,
            rounds_completed: vec![round],
            consciousness_score: 0.85,
            consensus_detected: false,
            key_insights: vec!["Round 1: trust".to_string()],
            termination: SessionTermination::Completed,
            connection_failures: BTreeMap::new(),
            skipped_rounds: vec![],
            started_at: "2026-01-01T00:00:00Z".to_string(),
            finished_at: "2026-01-01T00:00:01Z".to_string(),
        }
    }

    #[test]
    fn test_full_output_lists_voices_and_diagnostics() {
        let output = ConsoleFormatter::format(&completed());
        assert!(output.contains("Open the floor"));
        assert!(output.contains("  First thoughts\n  on two lines"));
        assert!(output.contains("echo:b#1 timed out"));
        assert!(output.contains("Request failed: boom"));
        assert!(output.contains("Round 1: trust"));
    }

    #[test]
    fn test_summary_omits_response_text() {
        let output = ConsoleFormatter::format_summary(&completed());
        assert!(output.contains("Board"));
        assert!(output.contains("score 0.85, 1 responses"));
        assert!(!output.contains("First thoughts"));
    }

    #[test]
    fn test_quorum_failure_is_reported() {
        let result = SessionResult::not_started(
            "s",
            "Board",
            1,
            SessionTermination::QuorumNotMet,
            BTreeMap::from([("echo:b#1".to_string(), "Connection refused".to_string())]),
            "2026-01-01T00:00:00Z",
            "2026-01-01T00:00:01Z",
        );
        let output = ConsoleFormatter::format_summary(&result);
        assert!(output.contains("echo:b#1: Connection refused"));
        assert!(output.contains("quorum_not_met"));
        assert!(!output.contains("Key Insights"));
    }

    #[test]
    fn test_render_json_roundtrips() {
        let result = completed();
        let json = ConsoleFormatter.render(&result, OutputFormat::Json);
        let parsed: SessionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
