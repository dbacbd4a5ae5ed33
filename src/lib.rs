//! Draftsmith - draft-and-refine reply engine for chat assistants
//!
//! Draftsmith drives an external text generator (the codex CLI) through
//! one or more passes per request: a draft, then a bounded ramp of refine
//! passes with a rising completeness target. The generator self-reports
//! incompleteness with a sentinel token; intermediate results stream to an
//! observer so a presentation layer can render "thinking → draft →
//! improving → final" without knowing anything about the pipeline.
//!
//! # Core Concepts
//!
//! - **One boundary**: only [`generator`] talks to the external process
//! - **Degrade, don't die**: a failed refine pass keeps the last good text
//! - **Marker protocol**: convergence means the incompleteness token is gone
//! - **Structured mode**: JSON payloads get exactly one retry with a
//!   JSON-only directive
//!
//! # Modules
//!
//! - [`generator`] - generator invocation boundary and failure diagnosis
//! - [`refine`] - multi-pass refinement engine and progress emission
//! - [`plan`] - structured planning workflow
//! - [`extract`] - JSON extraction from raw generator output
//! - [`prompts`] - prompt construction for every workflow kind
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod context;
pub mod extract;
pub mod generator;
pub mod plan;
pub mod prompts;
pub mod refine;

// Re-export commonly used types
pub use config::{Config, GeneratorConfig, RefineConfig};
pub use context::ContextBundle;
pub use extract::{ExtractError, extract_json};
pub use generator::{CodexGenerator, GenerateError, GenerationRequest, Generator, diagnose};
pub use plan::{Candidate, PlanFailure, PlanPayload, Planner};
pub use prompts::{JSON_ONLY_DIRECTIVE, PromptBuilder, PromptContext, PromptKind};
pub use refine::{
    EngineConfig, INCOMPLETE_MARKER, NullObserver, PassMetadata, PassSchedule, ProgressEvent,
    ProgressObserver, RefineEngine, ReplyOutcome, Stage, has_marker, strip_marker,
};
