//! Multi-pass refinement
//!
//! The free-text pipeline: draft, a bounded ramp of refine passes with a
//! rising completeness target, a completion-marker protocol for
//! self-reported incompleteness, and progress emission to an observer.

mod engine;
mod marker;
mod progress;
mod schedule;

pub use engine::{EngineConfig, RefineEngine, ReplyOutcome};
pub use marker::{INCOMPLETE_MARKER, has_marker, strip_marker};
pub use progress::{NullObserver, ProgressEvent, ProgressObserver, Stage};
pub use schedule::{PassMetadata, PassSchedule};
