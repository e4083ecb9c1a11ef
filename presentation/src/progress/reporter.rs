//! Progress reporting for session execution

use colored::Colorize;
use council_application::{SessionObserver, VoiceOutcome};
use council_domain::{RoundSpec, RoundSummary, SkippedRound};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a session with one progress bar per round
pub struct ProgressReporter {
    multi: MultiProgress,
    round_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            round_bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn line(&self, message: String) {
        let _ = self.multi.println(message);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn outcome_label(voice_id: &str, outcome: &VoiceOutcome) -> String {
    match outcome {
        VoiceOutcome::Responded { score, .. } => {
            format!("{} {} ({:.2})", "v".green(), voice_id, score)
        }
        VoiceOutcome::TimedOut => format!("{} {} (timed out)", "x".red(), voice_id),
        VoiceOutcome::Failed { .. } => format!("{} {} (failed)", "x".red(), voice_id),
    }
}

impl SessionObserver for ProgressReporter {
    fn on_session_start(&self, _session_id: &str, name: &str, participant_count: usize) {
        self.line(format!(
            "{} {} ({} voices requested)",
            "->".cyan(),
            name.bold(),
            participant_count
        ));
    }

    fn on_voice_connected(&self, voice_id: &str) {
        self.line(format!("  {} {} connected", "v".green(), voice_id));
    }

    fn on_voice_failed(&self, voice_id: &str, reason: &str) {
        self.line(format!("  {} {}: {}", "x".red(), voice_id, reason));
    }

    fn on_admission(&self, connected: usize, min_voices: usize, admitted: bool) {
        if !admitted {
            self.line(format!(
                "{} {} of {} required voices connected",
                "Quorum not met:".red().bold(),
                connected,
                min_voices
            ));
        }
    }

    fn on_round_start(&self, round_number: usize, spec: &RoundSpec, voice_count: usize) {
        let pb = self.multi.add(ProgressBar::new(voice_count as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(format!("Round {}: {}", round_number, spec.kind));
        pb.set_message("Waiting for voices...");

        if let Ok(mut bar) = self.round_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_voice_response(&self, _round_number: usize, voice_id: &str, outcome: &VoiceOutcome) {
        if let Ok(bar) = self.round_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(outcome_label(voice_id, outcome));
            pb.inc(1);
        }
    }

    fn on_round_complete(&self, summary: &RoundSummary) {
        if let Ok(mut bar) = self.round_bar.lock()
            && let Some(pb) = bar.take()
        {
            let mut message = format!("score {:.2}", summary.consciousness_score);
            if summary.emergence_detected {
                message.push_str(&format!(" {}", "emergence".magenta()));
            }
            pb.finish_with_message(message.green().to_string());
        }
    }

    fn on_round_skipped(&self, skipped: &SkippedRound) {
        if let Ok(mut bar) = self.round_bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.abandon_with_message("skipped".yellow().to_string());
        }
        self.line(format!(
            "  {} round {}: {}",
            "!".yellow(),
            skipped.round_number,
            skipped.reason
        ));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl SessionObserver for SimpleProgress {
    fn on_voice_failed(&self, voice_id: &str, reason: &str) {
        eprintln!("  {} {}: {}", "x".red(), voice_id, reason);
    }

    fn on_round_start(&self, round_number: usize, spec: &RoundSpec, voice_count: usize) {
        eprintln!(
            "{} {} ({} voices)",
            "->".cyan(),
            format!("Round {}: {}", round_number, spec.kind).bold(),
            voice_count
        );
    }

    fn on_voice_response(&self, _round_number: usize, voice_id: &str, outcome: &VoiceOutcome) {
        eprintln!("  {}", outcome_label(voice_id, outcome));
    }

    fn on_round_complete(&self, summary: &RoundSummary) {
        eprintln!("  score {:.2}", summary.consciousness_score);
        eprintln!();
    }
}
