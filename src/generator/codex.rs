//! Codex CLI generator implementation
//!
//! Implements the `Generator` trait by spawning the codex CLI as a
//! subprocess: one process per call, stdout captured as the result,
//! stderr captured for failure classification.

use async_trait::async_trait;
use std::process::Stdio;
use tracing::debug;

use super::{GenerateError, GenerationRequest, Generator};
use crate::config::GeneratorConfig;

/// Stderr fragments that mark an unauthenticated generator session
const AUTH_MARKERS: &[&str] = &["not logged in", "login", "auth"];

/// Generator backed by the codex CLI subprocess
pub struct CodexGenerator {
    program: String,
    args: Vec<String>,
}

impl CodexGenerator {
    /// Create a generator from configuration
    pub fn from_config(config: &GeneratorConfig) -> Self {
        debug!(program = %config.program, args = ?config.args, "CodexGenerator::from_config: called");
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
}

/// Check captured stderr for authentication-failure markers
fn looks_like_auth_failure(stderr: &str) -> bool {
    let haystack = stderr.to_lowercase();
    AUTH_MARKERS.iter().any(|marker| haystack.contains(marker))
}

#[async_trait]
impl Generator for CodexGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerateError> {
        debug!(
            program = %self.program,
            prompt_len = request.prompt.len(),
            cwd = ?request.cwd,
            timeout = ?request.timeout,
            "CodexGenerator::generate: called"
        );

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .arg(&request.prompt)
            .current_dir(&request.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let result = match request.timeout {
            Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                Ok(result) => result,
                Err(_) => {
                    debug!(?limit, "CodexGenerator::generate: call timed out");
                    return Err(GenerateError::TimedOut(limit));
                }
            },
            None => cmd.output().await,
        };

        let output = result.map_err(|e| {
            let message = format!("failed to spawn {}: {}", self.program, e);
            if e.kind() == std::io::ErrorKind::NotFound {
                GenerateError::NotFound(message)
            } else {
                GenerateError::Failed {
                    message,
                    stderr: String::new(),
                }
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let status = output.status.code().unwrap_or(-1);
            debug!(status, stderr_len = stderr.len(), "CodexGenerator::generate: abnormal exit");
            if looks_like_auth_failure(&stderr) {
                return Err(GenerateError::AuthRequired {
                    message: format!("{} is not authenticated (exit {})", self.program, status),
                    stderr,
                });
            }
            return Err(GenerateError::Failed {
                message: format!("{} exited with status {}", self.program, status),
                stderr,
            });
        }

        if stdout.trim().is_empty() {
            debug!("CodexGenerator::generate: empty stdout");
            return Err(GenerateError::EmptyOutput);
        }

        debug!(stdout_len = stdout.len(), "CodexGenerator::generate: success");
        Ok(stdout)
    }
}
