//! Structured-output extraction
//!
//! Generators asked for JSON routinely wrap it in prose or code fences.
//! The first-`{`/last-`}` scan below tolerates that without a grammar-aware
//! parser. Known limitation: unrelated braces in surrounding prose can
//! widen the slice and break the parse; the retry protocol in the planning
//! workflow exists to absorb exactly that.

use thiserror::Error;
use tracing::debug;

/// How much of the offending slice to keep for diagnostics
const SNIPPET_LIMIT: usize = 200;

/// Errors from locating and parsing a JSON object in raw generator output
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No `{...}` region present in the text
    #[error("no JSON object found in generator output")]
    NoJsonFound,

    /// A `{...}` region was found but did not parse
    #[error("malformed JSON in generator output: {source}")]
    MalformedJson {
        /// Start of the slice that failed to parse
        snippet: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Locate and parse the single JSON object expected in `raw`
///
/// No field-level validation happens here; callers check shape after the
/// parse succeeds.
pub fn extract_json(raw: &str) -> Result<serde_json::Value, ExtractError> {
    debug!(raw_len = raw.len(), "extract_json: called");

    let start = raw.find('{').ok_or(ExtractError::NoJsonFound)?;
    let end = raw.rfind('}').ok_or(ExtractError::NoJsonFound)?;
    if end <= start {
        debug!(start, end, "extract_json: closing brace not after opening brace");
        return Err(ExtractError::NoJsonFound);
    }

    let slice = &raw[start..=end];
    serde_json::from_str(slice).map_err(|source| {
        debug!(error = %source, "extract_json: slice did not parse");
        ExtractError::MalformedJson {
            snippet: slice.chars().take(SNIPPET_LIMIT).collect(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_object() {
        let value = extract_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_extract_ignores_surrounding_noise() {
        let value = extract_json("Sure, here you go:\n```json\n{\"a\":1}\n```\nEnjoy!").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_no_braces_is_no_json_found() {
        assert!(matches!(extract_json("no braces here"), Err(ExtractError::NoJsonFound)));
    }

    #[test]
    fn test_unclosed_object_is_no_json_found() {
        // '{' with no '}' anywhere after it
        assert!(matches!(extract_json("{not json"), Err(ExtractError::NoJsonFound)));
    }

    #[test]
    fn test_close_before_open_is_no_json_found() {
        assert!(matches!(extract_json("} then {"), Err(ExtractError::NoJsonFound)));
    }

    #[test]
    fn test_bad_slice_is_malformed() {
        let err = extract_json("{not json}").unwrap_err();
        match err {
            ExtractError::MalformedJson { snippet, .. } => assert!(snippet.starts_with("{not json")),
            other => panic!("expected MalformedJson, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_objects_parse() {
        let value = extract_json(r#"prefix {"outer": {"inner": 2}} suffix"#).unwrap();
        assert_eq!(value["outer"]["inner"], 2);
    }
}
