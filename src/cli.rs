//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Draftsmith - draft-and-refine reply engine
#[derive(Parser)]
#[command(
    name = "draftsmith",
    about = "Draft-and-refine reply engine driving the codex CLI",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask a question and refine the answer over multiple passes
    Ask {
        /// The question or request text
        question: String,

        /// JSON file with conversation context to embed in the prompt
        #[arg(long)]
        context: Option<PathBuf>,

        /// Override the refine-pass budget
        #[arg(long)]
        max_refines: Option<u32>,

        /// Disable refinement (single draft pass)
        #[arg(long)]
        no_refine: bool,
    },

    /// Request an outing plan as structured JSON (three candidates)
    Plan {
        /// What to plan, in plain language
        brief: String,

        /// JSON file with conversation context to embed in the prompt
        #[arg(long)]
        context: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the target-completeness schedule for a pass budget
    Schedule {
        /// Refine passes after the draft (defaults to the configured value)
        #[arg(short, long)]
        max_refines: Option<u32>,
    },

    /// Check that the generator CLI is installed and show the effective config
    Doctor,
}

/// Result of checking a required tool
pub struct ToolCheck {
    pub name: String,
    pub available: bool,
    pub version: Option<String>,
}

impl ToolCheck {
    /// Check if a tool is available and get its version
    pub fn check(name: &str, version_args: &[&str]) -> Self {
        debug!(name, ?version_args, "ToolCheck::check: called");
        let result = std::process::Command::new(name).args(version_args).output();

        match result {
            Ok(output) if output.status.success() => {
                debug!(name, "ToolCheck::check: tool available");
                let version_str = String::from_utf8_lossy(&output.stdout);
                let version = parse_version(&version_str);
                Self {
                    name: name.to_string(),
                    available: true,
                    version: Some(version),
                }
            }
            _ => {
                debug!(name, "ToolCheck::check: tool not available");
                Self {
                    name: name.to_string(),
                    available: false,
                    version: None,
                }
            }
        }
    }
}

/// Parse version from command output (extracts first version-like string)
fn parse_version(output: &str) -> String {
    for word in output.split_whitespace() {
        let word = word.trim_start_matches('v');
        if word.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            // Take until non-version character
            let version: String = word.chars().take_while(|c| c.is_ascii_digit() || *c == '.').collect();
            if !version.is_empty() {
                return version;
            }
        }
    }
    "unknown".to_string()
}

/// Output format for the plan command
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
