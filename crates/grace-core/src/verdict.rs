//! The safety classifier's judgment of one user input.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Safety, relevance, and topic flags for one input. Transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyVerdict {
    #[serde(default = "permissive")]
    pub is_safe: bool,
    #[serde(default = "permissive")]
    pub is_relevant: bool,
    #[serde(default)]
    pub is_sexual_topic: bool,
}

fn permissive() -> bool {
    true
}

impl SafetyVerdict {
    /// The verdict used whenever classification cannot run or fails.
    pub const FAIL_OPEN: Self = Self {
        is_safe: true,
        is_relevant: true,
        is_sexual_topic: false,
    };

    /// Response schema constraining the classifier's JSON output.
    pub fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "isSafe": { "type": "BOOLEAN" },
                "isRelevant": { "type": "BOOLEAN" },
                "isSexualTopic": { "type": "BOOLEAN" }
            },
            "required": ["isSafe", "isRelevant"]
        })
    }
}

impl Default for SafetyVerdict {
    fn default() -> Self {
        Self::FAIL_OPEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_verdict() {
        let v: SafetyVerdict =
            serde_json::from_str(r#"{"isSafe":false,"isRelevant":true,"isSexualTopic":false}"#)
                .unwrap();
        assert!(!v.is_safe);
        assert!(v.is_relevant);
    }

    #[test]
    fn test_missing_fields_are_permissive() {
        let v: SafetyVerdict = serde_json::from_str(r#"{"isSafe":true}"#).unwrap();
        assert_eq!(v, SafetyVerdict::FAIL_OPEN);
        let v: SafetyVerdict = serde_json::from_str("{}").unwrap();
        assert_eq!(v, SafetyVerdict::FAIL_OPEN);
    }

    #[test]
    fn test_schema_requires_core_fields() {
        let schema = SafetyVerdict::response_schema();
        assert_eq!(schema["required"], json!(["isSafe", "isRelevant"]));
        assert_eq!(schema["properties"]["isSexualTopic"]["type"], "BOOLEAN");
    }
}
