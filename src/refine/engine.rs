//! Refinement engine
//!
//! Drives one request through a draft pass and a bounded sequence of
//! refine passes. The generator self-reports incompleteness with the
//! completion marker; the engine stops when the marker disappears
//! (convergence) or the pass budget runs out (exhaustion, still a
//! success). A failed refine pass degrades to the last good text; only a
//! failed draft fails the whole request.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::marker::{has_marker, strip_marker};
use super::progress::{ProgressEvent, ProgressObserver, Stage};
use super::schedule::PassSchedule;
use crate::config::Config;
use crate::context::ContextBundle;
use crate::generator::{GENERIC_HINT, GenerateError, GenerationRequest, Generator, diagnose};
use crate::prompts::{PromptBuilder, PromptContext, PromptKind};

/// Lead-in for user-facing failure messages
const APOLOGY: &str = "Sorry - I couldn't put an answer together.";

/// Settings for one pipeline, resolved from `Config` at startup
///
/// The pipeline itself reads no ambient state; everything it needs
/// arrives through this struct.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Whether refine passes run at all
    pub refine_enabled: bool,
    /// Refine passes available after the draft
    pub max_refines: u32,
    /// Include verbose technical detail in failure results
    pub debug: bool,
    /// Working directory for generator invocations
    pub workdir: PathBuf,
    /// Per-invocation deadline
    pub timeout: Option<Duration>,
}

impl EngineConfig {
    /// Resolve settings from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            refine_enabled: config.refine.enabled,
            max_refines: config.refine.max_refines,
            debug: config.debug,
            workdir: config.generator.workdir.clone().unwrap_or_else(|| PathBuf::from(".")),
            timeout: (config.generator.timeout_ms > 0)
                .then(|| Duration::from_millis(config.generator.timeout_ms)),
        }
    }

    /// Refine passes actually available this session
    fn effective_refines(&self) -> u32 {
        if self.refine_enabled { self.max_refines } else { 0 }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Final result of one free-text request
#[derive(Debug, Clone)]
pub enum ReplyOutcome {
    /// An answer was produced (possibly incomplete, never empty)
    Answer {
        text: String,
        /// True iff the text differs from the original draft
        refined: bool,
    },
    /// The draft pass failed; no answer exists
    Failed {
        /// User-facing apology plus diagnosis hint
        message: String,
        /// Verbose technical detail, present only when debug is enabled
        debug: Option<String>,
    },
}

impl ReplyOutcome {
    pub fn is_answer(&self) -> bool {
        matches!(self, ReplyOutcome::Answer { .. })
    }

    /// The text a user would see, success or not
    pub fn text(&self) -> &str {
        match self {
            ReplyOutcome::Answer { text, .. } => text,
            ReplyOutcome::Failed { message, .. } => message,
        }
    }
}

/// Drives draft + refine passes for free-text requests
pub struct RefineEngine {
    generator: Arc<dyn Generator>,
    prompts: PromptBuilder,
    config: EngineConfig,
}

impl RefineEngine {
    pub fn new(generator: Arc<dyn Generator>, config: EngineConfig) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::new(),
            config,
        }
    }

    /// Run one request to completion
    ///
    /// All generator calls are strictly sequential; each refine pass
    /// depends on the previous pass's output. The observer is awaited
    /// after every pass that changed the visible text.
    pub async fn run(
        &self,
        question: &str,
        context: &ContextBundle,
        observer: &dyn ProgressObserver,
    ) -> ReplyOutcome {
        let schedule = PassSchedule::new(self.config.effective_refines());
        let total = schedule.total_passes();
        info!(total_passes = total, "RefineEngine::run: starting session");

        // Draft pass. Failure here is fatal: refinement cannot start from
        // nothing.
        let draft_ctx = PromptContext::draft(question, context, &schedule.metadata(1));
        let draft_prompt = match self.prompts.render(PromptKind::ReplyDraft, &draft_ctx) {
            Ok(prompt) => prompt,
            Err(e) => {
                error!(error = %e, "RefineEngine::run: failed to build draft prompt");
                return ReplyOutcome::Failed {
                    message: format!("{} {}", APOLOGY, GENERIC_HINT),
                    debug: self.config.debug.then(|| e.to_string()),
                };
            }
        };

        let raw = match self.invoke(draft_prompt).await {
            Ok(raw) => raw,
            Err(err) => {
                error!(error = %err, "RefineEngine::run: draft pass failed");
                return self.hard_failure(&err);
            }
        };

        // Internal text keeps the marker; display text never does and is
        // always re-derived by stripping, never mutated independently.
        let mut internal = raw.trim().to_string();
        if internal.is_empty() {
            // Refinement cannot start from nothing.
            error!("RefineEngine::run: draft pass returned empty text");
            return self.hard_failure(&GenerateError::EmptyOutput);
        }
        let mut display = strip_marker(&internal);
        let draft_display = display.clone();

        observer
            .on_progress(ProgressEvent {
                stage: Stage::Draft,
                text: display.clone(),
                pass: 1,
                total_passes: total,
                pending: self.config.refine_enabled && self.config.max_refines > 0,
            })
            .await;

        let mut aborted = false;
        for pass in 2..=total {
            if !has_marker(&internal) {
                break;
            }

            let meta = schedule.metadata(pass);
            let refine_ctx = PromptContext::refine(question, &internal, &meta);
            let prompt = match self.prompts.render(PromptKind::ReplyRefine, &refine_ctx) {
                Ok(prompt) => prompt,
                Err(e) => {
                    warn!(pass, error = %e, "RefineEngine::run: failed to build refine prompt");
                    aborted = true;
                    break;
                }
            };

            match self.invoke(prompt).await {
                Err(err) => {
                    // Non-fatal: the draft or the latest good refinement
                    // is still worth returning.
                    warn!(pass, error = %err, "RefineEngine::run: refine pass failed, keeping last good text");
                    aborted = true;
                    break;
                }
                Ok(raw) => {
                    let next = raw.trim().to_string();
                    if next == internal {
                        // Identical output still consumes the attempt.
                        debug!(pass, "RefineEngine::run: refine pass returned identical text");
                        continue;
                    }
                    internal = next;
                    display = strip_marker(&internal);
                    observer
                        .on_progress(ProgressEvent {
                            stage: Stage::Refined,
                            text: display.clone(),
                            pass,
                            total_passes: total,
                            pending: has_marker(&internal) && pass < total,
                        })
                        .await;
                }
            }
        }

        if aborted {
            info!("RefineEngine::run: stopped early after refine failure");
        } else if has_marker(&internal) {
            info!("RefineEngine::run: pass budget exhausted, returning best effort");
        } else {
            info!("RefineEngine::run: converged");
        }

        let refined = display != draft_display;
        ReplyOutcome::Answer { text: display, refined }
    }

    /// One boundary invocation with the session's workdir and deadline
    async fn invoke(&self, prompt: String) -> Result<String, GenerateError> {
        let mut request = GenerationRequest::new(prompt, self.config.workdir.clone());
        if let Some(timeout) = self.config.timeout {
            request = request.with_timeout(timeout);
        }
        self.generator.generate(request).await
    }

    fn hard_failure(&self, err: &GenerateError) -> ReplyOutcome {
        ReplyOutcome::Failed {
            message: format!("{} {}", APOLOGY, diagnose(err)),
            debug: self.config.debug.then(|| err.verbose()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::mock::MockGenerator;
    use crate::generator::{AUTH_HINT, NOT_FOUND_HINT};
    use crate::refine::INCOMPLETE_MARKER;
    use crate::refine::progress::NullObserver;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Observer that records every event for assertions
    #[derive(Default)]
    struct CollectingObserver {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl CollectingObserver {
        fn events(&self) -> Vec<ProgressEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProgressObserver for CollectingObserver {
        async fn on_progress(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn config(max_refines: u32) -> EngineConfig {
        EngineConfig {
            max_refines,
            ..EngineConfig::default()
        }
    }

    fn incomplete(text: &str) -> String {
        format!("{}\n{}", text, INCOMPLETE_MARKER)
    }

    #[tokio::test]
    async fn test_convergence_stops_when_marker_disappears() {
        let mock = Arc::new(MockGenerator::new(vec![
            Ok(incomplete("a rough draft")),
            Ok("a polished answer".to_string()),
        ]));
        let engine = RefineEngine::new(mock.clone(), config(3));
        let observer = CollectingObserver::default();

        let outcome = engine.run("question", &ContextBundle::default(), &observer).await;

        assert_eq!(mock.call_count(), 2);
        match outcome {
            ReplyOutcome::Answer { text, refined } => {
                assert_eq!(text, "a polished answer");
                assert!(refined);
            }
            other => panic!("expected Answer, got {:?}", other),
        }

        let events = observer.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].stage, Stage::Draft);
        assert_eq!(events[0].pass, 1);
        assert!(events[0].pending);
        assert_eq!(events[1].stage, Stage::Refined);
        assert_eq!(events[1].pass, 2);
        assert!(!events[1].pending);
        assert!(!events[1].text.contains(INCOMPLETE_MARKER));
    }

    #[tokio::test]
    async fn test_exhaustion_returns_best_effort() {
        let mock = Arc::new(MockGenerator::new(vec![
            Ok(incomplete("first")),
            Ok(incomplete("second")),
            Ok(incomplete("third")),
        ]));
        let engine = RefineEngine::new(mock.clone(), config(2));
        let observer = CollectingObserver::default();

        let outcome = engine.run("question", &ContextBundle::default(), &observer).await;

        // draft + 2 refines, never a failure
        assert_eq!(mock.call_count(), 3);
        match outcome {
            ReplyOutcome::Answer { text, refined } => {
                assert_eq!(text, "third");
                assert!(refined);
            }
            other => panic!("expected Answer, got {:?}", other),
        }
        assert_eq!(observer.events().len(), 3);
    }

    #[tokio::test]
    async fn test_refine_failure_keeps_last_good_text() {
        let mock = Arc::new(MockGenerator::new(vec![
            Ok(incomplete("the draft")),
            Err(GenerateError::Failed {
                message: "exit 1".to_string(),
                stderr: String::new(),
            }),
        ]));
        let engine = RefineEngine::new(mock.clone(), config(3));
        let observer = CollectingObserver::default();

        let outcome = engine.run("question", &ContextBundle::default(), &observer).await;

        assert_eq!(mock.call_count(), 2);
        match outcome {
            ReplyOutcome::Answer { text, refined } => {
                assert_eq!(text, "the draft");
                assert!(!refined);
            }
            other => panic!("expected Answer, got {:?}", other),
        }
        assert_eq!(observer.events().len(), 1);
    }

    #[tokio::test]
    async fn test_draft_failure_is_fatal_with_hint() {
        let mock = Arc::new(MockGenerator::new(vec![Err(GenerateError::NotFound(
            "failed to spawn codex: No such file or directory".to_string(),
        ))]));
        let engine = RefineEngine::new(mock.clone(), config(4));

        let outcome = engine
            .run("question", &ContextBundle::default(), &NullObserver)
            .await;

        assert_eq!(mock.call_count(), 1);
        match outcome {
            ReplyOutcome::Failed { message, debug } => {
                assert!(message.contains(NOT_FOUND_HINT));
                assert!(debug.is_none());
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_draft_is_fatal() {
        let mock = Arc::new(MockGenerator::new(vec![Ok("   \n".to_string())]));
        let engine = RefineEngine::new(mock.clone(), config(4));

        let outcome = engine
            .run("question", &ContextBundle::default(), &NullObserver)
            .await;

        assert_eq!(mock.call_count(), 1);
        assert!(!outcome.is_answer());
    }

    #[tokio::test]
    async fn test_draft_failure_debug_detail_gated_by_flag() {
        let mock = Arc::new(MockGenerator::new(vec![Err(GenerateError::AuthRequired {
            message: "codex is not authenticated (exit 1)".to_string(),
            stderr: "please run codex login".to_string(),
        })]));
        let engine = RefineEngine::new(
            mock,
            EngineConfig {
                debug: true,
                ..config(4)
            },
        );

        let outcome = engine
            .run("question", &ContextBundle::default(), &NullObserver)
            .await;

        match outcome {
            ReplyOutcome::Failed { message, debug } => {
                assert!(message.contains(AUTH_HINT));
                assert!(debug.unwrap().contains("codex login"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_identical_output_consumes_attempts_without_events() {
        let same = incomplete("stuck text");
        let mock = Arc::new(MockGenerator::new(vec![
            Ok(same.clone()),
            Ok(same.clone()),
            Ok(same.clone()),
        ]));
        let engine = RefineEngine::new(mock.clone(), config(2));
        let observer = CollectingObserver::default();

        let outcome = engine.run("question", &ContextBundle::default(), &observer).await;

        // All attempts consumed even though nothing changed
        assert_eq!(mock.call_count(), 3);
        assert_eq!(observer.events().len(), 1);
        match outcome {
            ReplyOutcome::Answer { text, refined } => {
                assert_eq!(text, "stuck text");
                assert!(!refined);
            }
            other => panic!("expected Answer, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_clean_draft_skips_refinement() {
        let mock = Arc::new(MockGenerator::new(vec![Ok("all done already".to_string())]));
        let engine = RefineEngine::new(mock.clone(), config(4));
        let observer = CollectingObserver::default();

        let outcome = engine.run("question", &ContextBundle::default(), &observer).await;

        assert_eq!(mock.call_count(), 1);
        assert_eq!(observer.events().len(), 1);
        assert!(matches!(outcome, ReplyOutcome::Answer { refined: false, .. }));
    }

    #[tokio::test]
    async fn test_refinement_disabled_runs_single_pass() {
        let mock = Arc::new(MockGenerator::new(vec![Ok(incomplete("one shot"))]));
        let engine = RefineEngine::new(
            mock.clone(),
            EngineConfig {
                refine_enabled: false,
                ..config(4)
            },
        );
        let observer = CollectingObserver::default();

        let outcome = engine.run("question", &ContextBundle::default(), &observer).await;

        assert_eq!(mock.call_count(), 1);
        let events = observer.events();
        assert_eq!(events.len(), 1);
        assert!(!events[0].pending);
        assert_eq!(events[0].total_passes, 1);
        // Marker stripped even when no refinement can follow
        assert_eq!(outcome.text(), "one shot");
    }

    #[tokio::test]
    async fn test_events_are_strictly_ordered_by_pass() {
        let mock = Arc::new(MockGenerator::new(vec![
            Ok(incomplete("v1")),
            Ok(incomplete("v2")),
            Ok(incomplete("v3")),
            Ok("v4".to_string()),
        ]));
        let engine = RefineEngine::new(mock, config(4));
        let observer = CollectingObserver::default();

        engine.run("question", &ContextBundle::default(), &observer).await;

        let passes: Vec<u32> = observer.events().iter().map(|e| e.pass).collect();
        assert_eq!(passes, vec![1, 2, 3, 4]);
    }
}
