//! Generator error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while invoking the external generator
///
/// This is a closed set: every technical failure of the subprocess call is
/// folded into one of these kinds. Retry policy lives in higher layers.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    /// The generator binary could not be started
    #[error("{0}")]
    NotFound(String),

    /// The generator refused to work without a login session
    #[error("{message}")]
    AuthRequired { message: String, stderr: String },

    /// The call exceeded its deadline
    #[error("generation timed out after {0:?}")]
    TimedOut(Duration),

    /// The process exited cleanly but produced nothing usable
    #[error("generator produced no output")]
    EmptyOutput,

    /// Any other abnormal exit or launch failure
    #[error("{message}")]
    Failed { message: String, stderr: String },
}

impl GenerateError {
    /// Captured standard-error text, where the failure carries one
    pub fn stderr(&self) -> Option<&str> {
        match self {
            GenerateError::AuthRequired { stderr, .. } | GenerateError::Failed { stderr, .. } => {
                Some(stderr.as_str())
            }
            _ => None,
        }
    }

    /// Check if this is a missing-executable error
    pub fn is_not_found(&self) -> bool {
        matches!(self, GenerateError::NotFound(_))
    }

    /// Check if this is an authentication error
    pub fn is_auth(&self) -> bool {
        matches!(self, GenerateError::AuthRequired { .. })
    }

    /// Check if this is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, GenerateError::TimedOut(_))
    }

    /// Full technical detail for debug surfaces and logs
    pub fn verbose(&self) -> String {
        match self.stderr() {
            Some(stderr) if !stderr.trim().is_empty() => {
                format!("{}\nstderr:\n{}", self, stderr.trim_end())
            }
            _ => self.to_string(),
        }
    }
}
