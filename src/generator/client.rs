//! Generator trait definition

use async_trait::async_trait;

use super::{GenerateError, GenerationRequest};

/// Stateless boundary to the external text generator
///
/// This is the only abstraction permitted to talk to the generation
/// process. Each call is independent: one prompt in, one text out, no
/// conversation state between calls. Retry policy belongs to callers,
/// never to implementations of this trait.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run one generation and return the captured output text
    ///
    /// Output is returned verbatim; trimming is the caller's
    /// responsibility.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerateError>;
}
