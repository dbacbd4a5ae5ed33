//! Structured planning workflow
//!
//! A narrower, two-attempt variant of the pipeline: failure here means
//! the generator did not produce a usable JSON payload, not that an
//! answer was incomplete. Exactly one retry, no backoff, no jitter; the
//! retry exists to strengthen instruction-following, not to ride out
//! infrastructure trouble.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::types::{EXPECTED_CANDIDATES, PlanPayload};
use crate::context::ContextBundle;
use crate::extract::{ExtractError, extract_json};
use crate::generator::{
    GENERIC_HINT, GenerateError, GenerationRequest, Generator, MALFORMED_OUTPUT_HINT, diagnose,
};
use crate::prompts::{JSON_ONLY_DIRECTIVE, PromptBuilder, PromptContext, PromptKind};
use crate::refine::EngineConfig;

/// Lead-in for user-facing failure messages
const APOLOGY: &str = "Sorry - I couldn't put a plan together.";

/// Worked example shown when a plan request fails
const USAGE_EXAMPLE: &str =
    "Try rephrasing the request, e.g. `plan \"three quiet places near the office for Friday, around 4000 per person\"`.";

/// Why one planning attempt failed
#[derive(Debug, Error)]
pub enum PlanAttemptError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Parsed JSON that does not match the payload contract
    #[error("plan payload did not match the expected shape: {0}")]
    Shape(String),

    /// Prompt construction failed before any attempt ran
    #[error("failed to build plan prompt: {0}")]
    Prompt(String),
}

impl PlanAttemptError {
    /// Short non-technical hint for this failure
    fn hint(&self) -> &'static str {
        match self {
            PlanAttemptError::Generate(err) => diagnose(err),
            PlanAttemptError::Extract(_) | PlanAttemptError::Shape(_) => MALFORMED_OUTPUT_HINT,
            PlanAttemptError::Prompt(_) => GENERIC_HINT,
        }
    }
}

/// Both attempts failed
///
/// The second error is decisive for user-facing diagnosis, falling back
/// to the first when no second attempt ran.
#[derive(Debug)]
pub struct PlanFailure {
    pub first: PlanAttemptError,
    pub second: Option<PlanAttemptError>,
}

impl PlanFailure {
    fn decisive(&self) -> &PlanAttemptError {
        self.second.as_ref().unwrap_or(&self.first)
    }

    /// Hint derived from the decisive error
    pub fn hint(&self) -> &'static str {
        self.decisive().hint()
    }

    /// Full user-facing failure text
    ///
    /// Verbose error detail is included only when `debug` is set;
    /// otherwise it stays in the logs.
    pub fn user_message(&self, debug: bool) -> String {
        let mut message = format!("{} {}\n\n{}", APOLOGY, self.hint(), USAGE_EXAMPLE);
        if debug {
            message.push_str(&format!("\n\nfirst attempt: {}", self.first));
            if let Some(second) = &self.second {
                message.push_str(&format!("\nsecond attempt: {}", second));
            }
        }
        message
    }
}

/// Runs the structured planning workflow
pub struct Planner {
    generator: Arc<dyn Generator>,
    prompts: PromptBuilder,
    config: EngineConfig,
}

impl Planner {
    pub fn new(generator: Arc<dyn Generator>, config: EngineConfig) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::new(),
            config,
        }
    }

    /// Produce a validated plan payload, retrying once on bad output
    pub async fn plan(&self, brief: &str, context: &ContextBundle) -> Result<PlanPayload, PlanFailure> {
        info!(brief_len = brief.len(), "Planner::plan: called");

        let plan_ctx = PromptContext::plan(brief, context);
        let base_prompt = match self.prompts.render(PromptKind::Plan, &plan_ctx) {
            Ok(prompt) => prompt,
            Err(e) => {
                return Err(PlanFailure {
                    first: PlanAttemptError::Prompt(e.to_string()),
                    second: None,
                });
            }
        };

        match self.attempt(base_prompt.clone()).await {
            Ok(payload) => Ok(payload),
            Err(first) => {
                warn!(error = %first, "Planner::plan: first attempt failed, retrying with JSON-only directive");
                let retry_prompt = format!("{}{}", base_prompt, JSON_ONLY_DIRECTIVE);
                match self.attempt(retry_prompt).await {
                    Ok(payload) => {
                        info!("Planner::plan: retry succeeded");
                        Ok(payload)
                    }
                    Err(second) => {
                        warn!(error = %second, "Planner::plan: retry failed");
                        Err(PlanFailure {
                            first,
                            second: Some(second),
                        })
                    }
                }
            }
        }
    }

    /// One boundary call plus extraction and shape validation
    async fn attempt(&self, prompt: String) -> Result<PlanPayload, PlanAttemptError> {
        let mut request = GenerationRequest::new(prompt, self.config.workdir.clone());
        if let Some(timeout) = self.config.timeout {
            request = request.with_timeout(timeout);
        }

        let raw = self.generator.generate(request).await?;
        let value = extract_json(&raw)?;
        debug!("Planner::attempt: JSON located and parsed");

        let payload: PlanPayload =
            serde_json::from_value(value).map_err(|e| PlanAttemptError::Shape(e.to_string()))?;

        if payload.candidates.len() != EXPECTED_CANDIDATES {
            return Err(PlanAttemptError::Shape(format!(
                "expected {} candidates, got {}",
                EXPECTED_CANDIDATES,
                payload.candidates.len()
            )));
        }

        Ok(payload)
    }
}
