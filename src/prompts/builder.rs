//! Prompt builder
//!
//! One construction path for every workflow, keyed by `PromptKind`. The
//! free-text and structured pipelines render through the same builder
//! instead of carrying parallel string-assembly code.

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;
use crate::context::ContextBundle;
use crate::refine::{INCOMPLETE_MARKER, PassMetadata};

/// Which prompt is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Free-text mode, first pass
    ReplyDraft,
    /// Free-text mode, later passes
    ReplyRefine,
    /// Structured planning mode
    Plan,
}

impl PromptKind {
    /// The embedded template for this kind
    fn template(&self) -> &'static str {
        match self {
            Self::ReplyDraft => embedded::REPLY_DRAFT,
            Self::ReplyRefine => embedded::REPLY_REFINE,
            Self::Plan => embedded::PLAN_REQUEST,
        }
    }
}

/// Context for rendering prompt templates
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// The user's request text
    pub question: String,
    /// Serialized conversation metadata, embedded verbatim when present
    pub context_json: Option<String>,
    /// Previous internal text (marker included) for refine passes
    pub previous: Option<String>,
    pub pass: u32,
    pub total_passes: u32,
    /// Advisory completeness target for this pass
    pub target: u8,
    pub is_final_pass: bool,
    /// The completion-marker token the generator is told to use
    pub marker: &'static str,
}

impl PromptContext {
    /// Context for the draft pass
    pub fn draft(question: &str, context: &ContextBundle, meta: &PassMetadata) -> Self {
        Self {
            question: question.to_string(),
            context_json: context.to_prompt_json(),
            previous: None,
            pass: meta.pass,
            total_passes: meta.total_passes,
            target: meta.target_completeness,
            is_final_pass: meta.is_final_pass,
            marker: INCOMPLETE_MARKER,
        }
    }

    /// Context for a refine pass over the previous internal text
    pub fn refine(question: &str, previous: &str, meta: &PassMetadata) -> Self {
        Self {
            question: question.to_string(),
            context_json: None,
            previous: Some(previous.to_string()),
            pass: meta.pass,
            total_passes: meta.total_passes,
            target: meta.target_completeness,
            is_final_pass: meta.is_final_pass,
            marker: INCOMPLETE_MARKER,
        }
    }

    /// Context for the structured planning request
    pub fn plan(brief: &str, context: &ContextBundle) -> Self {
        Self {
            question: brief.to_string(),
            context_json: context.to_prompt_json(),
            previous: None,
            pass: 1,
            total_passes: 1,
            target: 100,
            is_final_pass: true,
            marker: INCOMPLETE_MARKER,
        }
    }
}

/// Renders prompt templates for every workflow kind
pub struct PromptBuilder {
    hbs: Handlebars<'static>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            hbs: Handlebars::new(),
        }
    }

    /// Render the template for `kind` with the given context
    pub fn render(&self, kind: PromptKind, context: &PromptContext) -> Result<String> {
        debug!(?kind, pass = context.pass, total_passes = context.total_passes, "PromptBuilder::render: called");
        self.hbs
            .render_template(kind.template(), context)
            .map_err(|e| eyre!("failed to render {:?} prompt: {}", kind, e))
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refine::PassSchedule;

    fn builder() -> PromptBuilder {
        PromptBuilder::new()
    }

    #[test]
    fn test_draft_prompt_carries_pass_metadata() {
        let schedule = PassSchedule::new(4);
        let meta = schedule.metadata(1);
        let ctx = PromptContext::draft("where should we eat?", &ContextBundle::default(), &meta);

        let prompt = builder().render(PromptKind::ReplyDraft, &ctx).unwrap();
        assert!(prompt.contains("where should we eat?"));
        assert!(prompt.contains("pass 1 of 5"));
        assert!(prompt.contains("50%"));
        assert!(prompt.contains(INCOMPLETE_MARKER));
    }

    #[test]
    fn test_final_pass_omits_marker_protocol() {
        let schedule = PassSchedule::new(0);
        let meta = schedule.metadata(1);
        let ctx = PromptContext::draft("question", &ContextBundle::default(), &meta);

        let prompt = builder().render(PromptKind::ReplyDraft, &ctx).unwrap();
        assert!(prompt.contains("pass 1 of 1"));
        assert!(!prompt.contains(INCOMPLETE_MARKER));
    }

    #[test]
    fn test_refine_prompt_embeds_previous_text_verbatim() {
        let schedule = PassSchedule::new(2);
        let meta = schedule.metadata(2);
        let previous = format!("draft so far {}", INCOMPLETE_MARKER);
        let ctx = PromptContext::refine("question", &previous, &meta);

        let prompt = builder().render(PromptKind::ReplyRefine, &ctx).unwrap();
        assert!(prompt.contains(&previous));
        assert!(prompt.contains("pass 2 of 3"));
        assert!(prompt.contains("75%"));
    }

    #[test]
    fn test_context_bundle_embedded_when_present() {
        let bundle = ContextBundle::new(serde_json::json!({"requester": "ami"}));
        let schedule = PassSchedule::new(1);
        let ctx = PromptContext::draft("q", &bundle, &schedule.metadata(1));

        let prompt = builder().render(PromptKind::ReplyDraft, &ctx).unwrap();
        assert!(prompt.contains("Conversation context"));
        assert!(prompt.contains("\"requester\": \"ami\""));
    }

    #[test]
    fn test_empty_context_bundle_is_omitted() {
        let schedule = PassSchedule::new(1);
        let ctx = PromptContext::draft("q", &ContextBundle::default(), &schedule.metadata(1));

        let prompt = builder().render(PromptKind::ReplyDraft, &ctx).unwrap();
        assert!(!prompt.contains("Conversation context"));
    }

    #[test]
    fn test_text_is_not_html_escaped() {
        let schedule = PassSchedule::new(0);
        let ctx = PromptContext::draft("is a < b && b > c?", &ContextBundle::default(), &schedule.metadata(1));

        let prompt = builder().render(PromptKind::ReplyDraft, &ctx).unwrap();
        assert!(prompt.contains("is a < b && b > c?"));
    }

    #[test]
    fn test_plan_prompt_states_contract() {
        let ctx = PromptContext::plan("somewhere quiet on friday", &ContextBundle::default());
        let prompt = builder().render(PromptKind::Plan, &ctx).unwrap();
        assert!(prompt.contains("somewhere quiet on friday"));
        assert!(prompt.contains("exactly 3 entries"));
        assert!(prompt.contains("budgetAmount"));
    }
}
