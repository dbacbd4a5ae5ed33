//! Opaque conversation context
//!
//! The chat platform supplies a JSON bundle of conversation metadata
//! (recent messages, member list, requester profile, thread excerpt).
//! The pipeline never interprets its structure: it is serialized verbatim
//! into prompts and nothing else.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Opaque, JSON-serializable conversation metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextBundle(serde_json::Value);

impl ContextBundle {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Load a bundle from a JSON file (used by the inspection CLI)
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read context file {}", path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse context file {}", path.display()))?;
        Ok(Self(value))
    }

    /// Whether there is anything worth embedding
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Array(items) => items.is_empty(),
            serde_json::Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Pretty JSON for prompt embedding, or `None` when empty
    pub fn to_prompt_json(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        serde_json::to_string_pretty(&self.0).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(ContextBundle::default().is_empty());
        assert!(ContextBundle::default().to_prompt_json().is_none());
    }

    #[test]
    fn test_empty_object_is_empty() {
        assert!(ContextBundle::new(serde_json::json!({})).is_empty());
    }

    #[test]
    fn test_populated_bundle_serializes() {
        let bundle = ContextBundle::new(serde_json::json!({
            "recent_messages": ["hi", "anyone around?"],
            "requester": {"name": "ami"},
        }));
        let json = bundle.to_prompt_json().unwrap();
        assert!(json.contains("recent_messages"));
        assert!(json.contains("ami"));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctx.json");
        std::fs::write(&path, r#"{"members": ["a", "b"]}"#).unwrap();

        let bundle = ContextBundle::from_json_file(&path).unwrap();
        assert!(!bundle.is_empty());
        assert!(bundle.to_prompt_json().unwrap().contains("members"));
    }

    #[test]
    fn test_from_missing_file_fails() {
        assert!(ContextBundle::from_json_file("/nonexistent/ctx.json").is_err());
    }
}
