//! Draftsmith - draft-and-refine reply engine
//!
//! CLI entry point for running and inspecting the refinement pipeline.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use draftsmith::cli::{Cli, Command, OutputFormat, ToolCheck};
use draftsmith::config::Config;
use draftsmith::context::ContextBundle;
use draftsmith::generator::{CodexGenerator, Generator};
use draftsmith::plan::Planner;
use draftsmith::refine::{
    EngineConfig, PassSchedule, ProgressEvent, ProgressObserver, RefineEngine, ReplyOutcome,
};

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("draftsmith")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = if let Some(s) = cli_log_level {
        match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        }
    } else {
        tracing::Level::INFO
    };

    let log_file = fs::File::create(log_dir.join("draftsmith.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Ask {
            question,
            context,
            max_refines,
            no_refine,
        } => cmd_ask(&config, &question, context.as_ref(), max_refines, no_refine).await,
        Command::Plan {
            brief,
            context,
            format,
        } => cmd_plan(&config, &brief, context.as_ref(), format).await,
        Command::Schedule { max_refines } => cmd_schedule(&config, max_refines),
        Command::Doctor => cmd_doctor(&config),
    }
}

/// Observer that prints each pass to the terminal as it lands
///
/// Stands in for the chat presentation layer, which would edit a posted
/// message in place instead.
struct ConsoleObserver;

#[async_trait]
impl ProgressObserver for ConsoleObserver {
    async fn on_progress(&self, event: ProgressEvent) {
        let status = if event.pending { "still working" } else { "final" };
        println!(
            "--- {} (pass {}/{}, {}) ---",
            event.stage, event.pass, event.total_passes, status
        );
        println!("{}\n", event.text);
    }
}

/// Load the optional context bundle for a command
fn load_context(path: Option<&PathBuf>) -> Result<ContextBundle> {
    match path {
        Some(path) => ContextBundle::from_json_file(path),
        None => Ok(ContextBundle::default()),
    }
}

/// Run the free-text pipeline
async fn cmd_ask(
    config: &Config,
    question: &str,
    context: Option<&PathBuf>,
    max_refines: Option<u32>,
    no_refine: bool,
) -> Result<()> {
    debug!(%question, ?max_refines, no_refine, "cmd_ask: called");
    let bundle = load_context(context)?;

    let mut engine_config = EngineConfig::from_config(config);
    if let Some(n) = max_refines {
        engine_config.max_refines = n;
    }
    if no_refine {
        engine_config.refine_enabled = false;
    }

    let generator: Arc<dyn Generator> = Arc::new(CodexGenerator::from_config(&config.generator));
    let engine = RefineEngine::new(generator, engine_config);

    match engine.run(question, &bundle, &ConsoleObserver).await {
        ReplyOutcome::Answer { refined, .. } => {
            debug!(refined, "cmd_ask: answer produced");
            println!("✓ done{}", if refined { " (refined)" } else { "" });
            Ok(())
        }
        ReplyOutcome::Failed { message, debug } => {
            println!("✗ {}", message);
            if let Some(detail) = debug {
                eprintln!("{}", detail);
            }
            std::process::exit(1);
        }
    }
}

/// Run the structured planning workflow
async fn cmd_plan(config: &Config, brief: &str, context: Option<&PathBuf>, format: OutputFormat) -> Result<()> {
    debug!(%brief, ?format, "cmd_plan: called");
    let bundle = load_context(context)?;

    let generator: Arc<dyn Generator> = Arc::new(CodexGenerator::from_config(&config.generator));
    let planner = Planner::new(generator, EngineConfig::from_config(config));

    match planner.plan(brief, &bundle).await {
        Ok(payload) => {
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Text => {
                    for (idx, candidate) in payload.candidates.iter().enumerate() {
                        println!(
                            "{}. {} - {} (budget {}, {} min walk)",
                            idx + 1,
                            candidate.name,
                            candidate.vibe,
                            candidate.budget_amount,
                            candidate.walk_minutes
                        );
                        println!("   {}", candidate.reason);
                        println!("   {}", candidate.reference_url);
                        println!();
                    }
                    println!("{}", payload.final_message);
                }
            }
            Ok(())
        }
        Err(failure) => {
            println!("✗ {}", failure.user_message(config.debug));
            std::process::exit(1);
        }
    }
}

/// Print the target-completeness schedule
fn cmd_schedule(config: &Config, max_refines: Option<u32>) -> Result<()> {
    let max_refines = max_refines.unwrap_or(config.refine.max_refines);
    debug!(max_refines, "cmd_schedule: called");
    let schedule = PassSchedule::new(max_refines);

    println!("{:<6} {:<8} {:<6}", "PASS", "TARGET", "FINAL");
    println!("{}", "-".repeat(22));
    for pass in 1..=schedule.total_passes() {
        let meta = schedule.metadata(pass);
        println!(
            "{:<6} {:<8} {:<6}",
            meta.pass,
            format!("{}%", meta.target_completeness),
            if meta.is_final_pass { "yes" } else { "no" }
        );
    }
    Ok(())
}

/// Check the generator binary and show the effective configuration
fn cmd_doctor(config: &Config) -> Result<()> {
    debug!("cmd_doctor: called");
    let check = ToolCheck::check(&config.generator.program, &["--version"]);

    println!("Generator:");
    let icon = if check.available { "✓" } else { "✗" };
    let version = check.version.as_deref().unwrap_or("not found");
    println!("  {} {:<10} {}", icon, check.name, version);
    if !check.available {
        println!("  Install the {} CLI and make sure it is on PATH.", check.name);
    }

    println!();
    println!("Effective configuration:");
    println!("  program:      {}", config.generator.program);
    println!("  args:         {:?}", config.generator.args);
    println!("  timeout-ms:   {}", config.generator.timeout_ms);
    println!("  refine:       {}", if config.refine.enabled { "enabled" } else { "disabled" });
    println!("  max-refines:  {}", config.refine.max_refines);
    println!("  debug:        {}", config.debug);

    Ok(())
}
