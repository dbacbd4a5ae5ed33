//! Failure diagnosis
//!
//! Turns a technical generator failure into a short, non-technical hint
//! suitable for a chat reply. Raw detail stays in logs and debug output.

use super::GenerateError;

/// Hint for a missing generator executable
pub const NOT_FOUND_HINT: &str =
    "It looks like the codex CLI is not installed on this machine. Install it and make sure it is on PATH.";

/// Hint for an unauthenticated generator
pub const AUTH_HINT: &str =
    "The codex CLI is not logged in. Run `codex login` on the host and try again.";

/// Hint for a timed-out call
pub const TIMEOUT_HINT: &str =
    "The generator took too long to answer. Try again, or ask a smaller question.";

/// Hint for everything else
pub const GENERIC_HINT: &str =
    "Something went wrong while generating the answer. Try again in a moment.";

/// Hint for structured output that could not be parsed
pub const MALFORMED_OUTPUT_HINT: &str =
    "The generator replied with something that wasn't the JSON I asked for. Try again in a moment.";

/// Classify a generator failure into a human-meaningful hint
///
/// Typed kinds map directly. The untyped `Failed` kind falls back to an
/// ordered keyword scan over the lower-cased message and stderr; order
/// matters because messages often carry several of these substrings at
/// once (an auth failure wrapped in a generic error still reads as auth).
pub fn diagnose(error: &GenerateError) -> &'static str {
    match error {
        GenerateError::NotFound(_) => NOT_FOUND_HINT,
        GenerateError::AuthRequired { .. } => AUTH_HINT,
        GenerateError::TimedOut(_) => TIMEOUT_HINT,
        GenerateError::EmptyOutput => GENERIC_HINT,
        GenerateError::Failed { message, stderr } => {
            let haystack = format!("{} {}", message, stderr).to_lowercase();
            if haystack.contains("enoent") || haystack.contains("spawn codex") {
                NOT_FOUND_HINT
            } else if ["login", "not logged in", "auth"]
                .iter()
                .any(|needle| haystack.contains(needle))
            {
                AUTH_HINT
            } else if haystack.contains("timed out") {
                TIMEOUT_HINT
            } else {
                GENERIC_HINT
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn failed(message: &str, stderr: &str) -> GenerateError {
        GenerateError::Failed {
            message: message.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_typed_kinds_map_directly() {
        assert_eq!(
            diagnose(&GenerateError::NotFound("failed to spawn codex".into())),
            NOT_FOUND_HINT
        );
        assert_eq!(
            diagnose(&GenerateError::AuthRequired {
                message: "codex is not authenticated".into(),
                stderr: String::new(),
            }),
            AUTH_HINT
        );
        assert_eq!(diagnose(&GenerateError::TimedOut(Duration::from_secs(30))), TIMEOUT_HINT);
        assert_eq!(diagnose(&GenerateError::EmptyOutput), GENERIC_HINT);
    }

    #[test]
    fn test_keyword_scan_on_generic_failures() {
        assert_eq!(diagnose(&failed("spawn codex ENOENT", "")), NOT_FOUND_HINT);
        assert_eq!(diagnose(&failed("exit 1", "please run codex login first")), AUTH_HINT);
        assert_eq!(diagnose(&failed("request timed out", "")), TIMEOUT_HINT);
        assert_eq!(diagnose(&failed("exit 1", "segfault")), GENERIC_HINT);
    }

    #[test]
    fn test_auth_beats_timeout() {
        // Messages may match several rules at once; auth is checked first.
        let err = failed("auth session expired", "request timed out waiting for login");
        assert_eq!(diagnose(&err), AUTH_HINT);
    }

    #[test]
    fn test_not_found_beats_auth() {
        let err = failed("spawn codex ENOENT", "no login session");
        assert_eq!(diagnose(&err), NOT_FOUND_HINT);
    }
}
