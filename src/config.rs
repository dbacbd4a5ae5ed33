//! Draftsmith configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main draftsmith configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External generator configuration
    pub generator: GeneratorConfig,

    /// Refinement pipeline configuration
    pub refine: RefineConfig,

    /// Include verbose technical detail in user-facing failures
    pub debug: bool,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if self.generator.program.trim().is_empty() {
            return Err(eyre::eyre!("generator.program must not be empty"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .draftsmith.yml
        let local_config = PathBuf::from(".draftsmith.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/draftsmith/draftsmith.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("draftsmith").join("draftsmith.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// External generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Generator executable
    pub program: String,

    /// Arguments placed before the prompt
    pub args: Vec<String>,

    /// Working directory for the generator process (defaults to the
    /// current directory)
    pub workdir: Option<PathBuf>,

    /// Per-call timeout in milliseconds; 0 disables the deadline
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "codex".to_string(),
            args: vec!["exec".to_string()],
            workdir: None,
            timeout_ms: 120_000,
        }
    }
}

/// Refinement pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Whether refinement passes run at all
    pub enabled: bool,

    /// Maximum refine passes after the draft
    #[serde(rename = "max-refines")]
    pub max_refines: u32,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_refines: 4,
        }
    }
}
