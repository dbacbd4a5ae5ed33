//! Structured planning payload
//!
//! Wire schema the generator must follow in structured mode. Field names
//! are camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Number of candidates the generator must return
pub const EXPECTED_CANDIDATES: usize = 3;

/// One suggested venue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    /// Why this venue fits the request
    pub reason: String,
    /// Rough per-person budget
    pub budget_amount: f64,
    /// Walking time from the office
    pub walk_minutes: u32,
    /// One-phrase atmosphere descriptor
    pub vibe: String,
    pub reference_url: String,
}

/// Full planning payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPayload {
    /// Exactly three candidates (checked by the planner, not by serde)
    pub candidates: Vec<Candidate>,
    /// Closing line for the chat
    pub final_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_deserializes_camel_case() {
        let json = r#"{
            "candidates": [
                {
                    "name": "Torikizoku",
                    "reason": "cheap and close",
                    "budgetAmount": 2500,
                    "walkMinutes": 5,
                    "vibe": "lively",
                    "referenceUrl": "https://example.com/torikizoku"
                }
            ],
            "finalMessage": "enjoy!"
        }"#;

        let payload: PlanPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.candidates.len(), 1);
        assert_eq!(payload.candidates[0].walk_minutes, 5);
        assert_eq!(payload.final_message, "enjoy!");
    }

    #[test]
    fn test_payload_round_trips_field_names() {
        let payload = PlanPayload {
            candidates: vec![],
            final_message: "done".to_string(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("finalMessage"));
        assert!(!json.contains("final_message"));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{"candidates": []}"#;
        assert!(serde_json::from_str::<PlanPayload>(json).is_err());
    }
}
