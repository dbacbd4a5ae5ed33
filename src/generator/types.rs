//! Generation request types

use std::path::PathBuf;
use std::time::Duration;

/// A single invocation of the external generator
///
/// Created once per attempt, owned by the boundary for the duration of
/// the call, discarded afterwards.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Prompt text handed to the generator verbatim
    pub prompt: String,

    /// Working directory the generator process runs in
    pub cwd: PathBuf,

    /// Per-call deadline; `None` means the call is unbounded
    pub timeout: Option<Duration>,
}

impl GenerationRequest {
    /// Create a request with no deadline
    pub fn new(prompt: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            prompt: prompt.into(),
            cwd: cwd.into(),
            timeout: None,
        }
    }

    /// Bound the call by a deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
