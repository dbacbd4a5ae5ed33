//! Prompt construction
//!
//! All workflows build their prompts here, keyed by `PromptKind`, so the
//! free-text and structured pipelines cannot drift apart.

mod builder;
mod embedded;

pub use builder::{PromptBuilder, PromptContext, PromptKind};
pub use embedded::JSON_ONLY_DIRECTIVE;
