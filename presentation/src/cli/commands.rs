//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for session results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every round with every voice response
    Full,
    /// Verdict, scores and insights only
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for council_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => council_domain::OutputFormat::Full,
            OutputFormat::Summary => council_domain::OutputFormat::Summary,
            OutputFormat::Json => council_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for voice-council
#[derive(Parser, Debug)]
#[command(name = "voice-council")]
#[command(author, version, about = "Convene a council of independent AI voices")]
#[command(long_about = r#"
Voice Council convenes several independently hosted AI voices and runs them
through a sequence of deliberation rounds.

A session starts only when enough voices connect (the quorum). Every round
sends the same prompt to all live voices in parallel; the results are scored,
checked for emergence and consensus, and summarized into key insights.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./council.toml      Project-level config
3. ~/.config/voice-council/config.toml   Global config

Example:
  voice-council --list-templates
  voice-council --template governance_decision --topic "Adopt a four-day week?"
  voice-council --template code_review --context focus_areas=security,performance
  voice-council --template ethics_review --provider local --output json
"#)]
pub struct Cli {
    /// Template to instantiate
    #[arg(short, long, value_name = "NAME", default_value = "governance_decision")]
    pub template: String,

    /// Topic handed to the template
    #[arg(long, value_name = "TOPIC")]
    pub topic: Option<String>,

    /// Extra template context (can be specified multiple times)
    #[arg(long = "context", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub context: Vec<(String, String)>,

    /// Provider for every voice the template declares
    #[arg(short, long, value_name = "NAME")]
    pub provider: Option<String>,

    /// Provider used for voices whose provider is not configured
    #[arg(long, value_name = "NAME")]
    pub fallback_provider: Option<String>,

    /// List available templates and exit
    #[arg(long)]
    pub list_templates: bool,

    /// Output format (defaults to the config file's, then summary)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Write session events as JSONL to this file
    #[arg(long, value_name = "PATH")]
    pub events: Option<PathBuf>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["voice-council"]).unwrap();
        assert_eq!(cli.template, "governance_decision");
        assert!(cli.output.is_none());
        assert!(cli.context.is_empty());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_context_pairs() {
        let cli = Cli::try_parse_from([
            "voice-council",
            "--template",
            "code_review",
            "--context",
            "focus_areas=security,performance",
            "--context",
            "name = Weekly review",
            "-vv",
        ])
        .unwrap();
        assert_eq!(
            cli.context,
            vec![
                (
                    "focus_areas".to_string(),
                    "security,performance".to_string()
                ),
                ("name".to_string(), "Weekly review".to_string()),
            ]
        );
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_malformed_context_is_rejected() {
        assert!(Cli::try_parse_from(["voice-council", "--context", "novalue"]).is_err());
        assert!(Cli::try_parse_from(["voice-council", "--context", "=x"]).is_err());
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        let cli = Cli::try_parse_from(["voice-council", "--output", "json"]).unwrap();
        assert_eq!(
            council_domain::OutputFormat::from(cli.output.unwrap()),
            council_domain::OutputFormat::Json
        );
    }
}
