//! Progress emission
//!
//! After each pass that changed the visible text, the engine pushes one
//! event to a caller-supplied observer. Events are strictly ordered by
//! pass number and delivered at most once per pass. The engine awaits the
//! observer but cannot be failed by it: the callback is infallible by
//! signature, so presentation-layer I/O problems stay on the presentation
//! side.

use async_trait::async_trait;

/// Which kind of pass produced the event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// First pass of a session
    Draft,
    /// Any later pass that changed the text
    Refined,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Draft => write!(f, "draft"),
            Stage::Refined => write!(f, "refined"),
        }
    }
}

/// One progress update surfaced to the presentation layer
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub stage: Stage,
    /// Display text for this pass, marker already stripped
    pub text: String,
    /// 1-based pass number that produced the text
    pub pass: u32,
    pub total_passes: u32,
    /// Whether more work is expected after this event
    pub pending: bool,
}

/// Receiver for intermediate pipeline results
///
/// Implemented by whatever renders the session (a chat message being
/// edited in place, a terminal, a test collector). Invoked 0..N times per
/// request, N bounded by the pass budget.
#[async_trait]
pub trait ProgressObserver: Send + Sync {
    async fn on_progress(&self, event: ProgressEvent);
}

/// Observer that discards all events
pub struct NullObserver;

#[async_trait]
impl ProgressObserver for NullObserver {
    async fn on_progress(&self, _event: ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Draft.to_string(), "draft");
        assert_eq!(Stage::Refined.to_string(), "refined");
    }

    #[tokio::test]
    async fn test_null_observer_accepts_events() {
        NullObserver
            .on_progress(ProgressEvent {
                stage: Stage::Draft,
                text: "hi".to_string(),
                pass: 1,
                total_passes: 1,
                pending: false,
            })
            .await;
    }
}
