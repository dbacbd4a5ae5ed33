//! Completion-marker sentinel
//!
//! The generator appends this token when it judges its own answer
//! incomplete; the refinement loop keys its termination on it. Display
//! text never carries the marker.

/// Sentinel the generator appends to self-report an incomplete answer
pub const INCOMPLETE_MARKER: &str = "[[INCOMPLETE]]";

/// Check whether text still carries the marker
pub fn has_marker(text: &str) -> bool {
    text.contains(INCOMPLETE_MARKER)
}

/// Remove the marker for display
///
/// Pure and idempotent; text without the marker passes through untouched.
pub fn strip_marker(text: &str) -> String {
    if !has_marker(text) {
        return text.to_string();
    }
    text.replace(INCOMPLETE_MARKER, "").trim_end().to_string()
}
