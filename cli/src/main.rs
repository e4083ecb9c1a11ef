//! CLI entrypoint for Voice Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{CompositeObserver, ConveneInput, ConveneSessionUseCase};
use council_domain::template::PROVIDER_OVERRIDE_KEY;
use council_domain::{OutputFormat, TemplateContext, TemplateRegistry};
use council_infrastructure::{
    ConfigIssue, ConfigLoader, FileConfig, JsonTranscriptStore, JsonlEventLog, ProviderRegistry,
};
use council_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Exit code when the council could not convene (quorum not met, admission rejected)
const EXIT_NOT_CONVENED: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting Voice Council");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let templates = TemplateRegistry::with_builtins();
    if cli.list_templates {
        for (name, description) in templates.describe() {
            println!("{name:<28} {description}");
        }
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    report_issues(&config.validate())?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    // === Session request ===
    let mut context = TemplateContext::new();
    for (key, value) in &cli.context {
        context.insert(key.clone(), value.clone());
    }
    if let Some(topic) = &cli.topic {
        context.insert("topic", topic.clone());
    }
    if let Some(provider) = &cli.provider {
        context.insert(PROVIDER_OVERRIDE_KEY, provider.clone());
    }

    let template = templates.load_template(&cli.template, &context)?;
    let mut input = ConveneInput::from_template(template.as_ref());
    let (session_config, issues) = config.session.apply(input.config);
    report_issues(&issues)?;
    input.config = session_config;

    // === Dependency Injection ===
    let registry = build_registry(&config, &input, cli.fallback_provider.as_deref())?;
    let transcripts = JsonTranscriptStore::new(config.transcript.resolve_directory());
    let use_case = ConveneSessionUseCase::new(Arc::new(registry))
        .with_transcript_store(Arc::new(transcripts));

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    // === Observers ===
    let show_progress = !cli.quiet && format != OutputFormat::Json;
    let reporter = ProgressReporter::new();
    let event_log = cli.events.as_deref().and_then(|path| {
        let log = JsonlEventLog::new(path);
        if log.is_none() {
            warn!("Session events will not be recorded");
        }
        log
    });

    let mut observer = CompositeObserver::new(Vec::new());
    if show_progress {
        if config.output.show_progress {
            observer.push(&reporter);
        } else {
            observer.push(&SimpleProgress);
        }
    }
    if let Some(log) = &event_log {
        observer.push(log);
    }

    // === Run ===
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, dismissing the council");
            on_interrupt.cancel();
        }
    });

    let result = use_case
        .execute_until_cancelled(input, &observer, cancel)
        .await?;

    println!("{}", ConsoleFormatter.render(&result, format));

    if !result.termination.is_completed() {
        drop(event_log);
        drop(log_guard);
        std::process::exit(EXIT_NOT_CONVENED);
    }

    Ok(())
}

/// Install the tracing subscriber; with `log_file`, logs go there instead of stderr
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Initialize logging based on verbosity level
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file = std::fs::File::create(path)
        .with_context(|| format!("Could not create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();

    Ok(Some(guard))
}

/// Print configuration issues; any error aborts
fn report_issues(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues {
        eprintln!("{issue}");
    }
    if issues.iter().any(ConfigIssue::is_error) {
        bail!("Invalid configuration");
    }
    Ok(())
}

fn build_registry(
    config: &FileConfig,
    input: &ConveneInput,
    fallback: Option<&str>,
) -> Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::from_config(config);

    if let Some(fallback) = fallback {
        if !registry.contains(fallback) {
            bail!(
                "Fallback provider '{}' is not configured (available: {})",
                fallback,
                registry.names().join(", ")
            );
        }
        registry = registry.with_fallback(fallback);
    } else {
        for voice in &input.voices {
            if !registry.contains(&voice.provider) {
                warn!(
                    "Provider '{}' for {} is not configured; the voice will fail to connect",
                    voice.provider,
                    voice.label()
                );
            }
        }
    }

    Ok(registry)
}
