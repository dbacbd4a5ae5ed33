//! Generator invocation boundary
//!
//! The single place that knows how to talk to the external generation
//! process. Everything above this module treats generation as an opaque
//! async function: prompt in, text out, classified failure.

mod client;
mod codex;
mod diagnose;
mod error;
mod types;

pub use client::Generator;
#[cfg(test)]
pub use client::mock;
pub use codex::CodexGenerator;
pub use diagnose::{
    AUTH_HINT, GENERIC_HINT, MALFORMED_OUTPUT_HINT, NOT_FOUND_HINT, TIMEOUT_HINT, diagnose,
};
pub use error::GenerateError;
pub use types::GenerationRequest;
