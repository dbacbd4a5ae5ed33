//! Embedded prompt templates
//!
//! Compiled into the binary; rendered with handlebars. All text
//! substitutions use triple braces so handlebars does not HTML-escape
//! chat content.

/// First pass: produce a working draft
pub const REPLY_DRAFT: &str = r#"You are a helpful assistant answering a request from a team chat.

## Request

{{{question}}}
{{#if context_json}}
## Conversation context

The JSON below is metadata about the conversation (recent messages, member
list, requester, thread excerpt). Use it to ground your answer; do not echo
it back.

{{{context_json}}}
{{/if}}
## Instructions

This is pass {{pass}} of {{total_passes}}. Aim for roughly {{target}}% of a complete answer.
{{#if is_final_pass}}This is the only pass: give the best complete answer you can.{{else}}If your answer is not yet complete, append the token {{marker}} on its own line at the very end so a later pass can pick it up. Omit the token once the answer is complete.{{/if}}

Write the answer only, with no preamble about what you are doing.
"#;

/// Later passes: improve the previous draft
pub const REPLY_REFINE: &str = r#"You are improving a working draft of an answer for a team chat.

## Original request

{{{question}}}

## Current draft

{{{previous}}}

## Instructions

This is pass {{pass}} of {{total_passes}}. Raise the draft to roughly {{target}}% of a complete answer: fix mistakes, fill gaps, keep what is already good.
{{#if is_final_pass}}This is the final pass: output the finished answer.{{else}}If the answer is still not complete, append the token {{marker}} on its own line at the very end. Omit the token once the answer is complete.{{/if}}

Output the full revised answer, not a diff.
"#;

/// Structured planning request
pub const PLAN_REQUEST: &str = r#"You are planning an outing for a team chat and must answer with machine-readable JSON.

## Request

{{{question}}}
{{#if context_json}}
## Conversation context

The JSON below is metadata about the conversation. Use it to pick venues
that fit the group; do not echo it back.

{{{context_json}}}
{{/if}}
## Output format

Return exactly one JSON object shaped like this:

{
  "candidates": [
    {
      "name": "venue name",
      "reason": "why this fits the request",
      "budgetAmount": 4000,
      "walkMinutes": 10,
      "vibe": "lively, quiet, cozy...",
      "referenceUrl": "https://example.com/venue"
    }
  ],
  "finalMessage": "one short closing line for the chat"
}

The candidates array must contain exactly 3 entries.
"#;

/// Appended verbatim to the base prompt on the structured retry
pub const JSON_ONLY_DIRECTIVE: &str =
    "\n\nIMPORTANT: Respond with ONLY one valid JSON object. No prose, no explanations, no code fences.";
