//! Verdict and error payloads published by the scoring service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verdict published for a scored account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountVerdict {
    /// Unique verdict identifier
    pub verdict_id: String,

    /// Caller-supplied account identifier, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    /// Predicted class (0 = real, 1 = fake)
    pub prediction: u8,

    /// Probability of the fake class
    pub probability: f64,

    /// Convenience boolean mirror of `prediction`
    pub is_fake: bool,

    /// max(probability, 1 - probability)
    pub confidence: f64,

    /// Verdict generation timestamp
    pub timestamp: DateTime<Utc>,
}

/// Structured failure payload for API-style callers. No result fields are
/// populated on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    /// Human-readable cause
    pub error: String,

    pub timestamp: DateTime<Utc>,
}

impl ErrorPayload {
    pub fn new(account_id: Option<String>, error: impl Into<String>) -> Self {
        Self {
            account_id,
            error: error.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serialization() {
        let verdict = AccountVerdict {
            verdict_id: uuid::Uuid::new_v4().to_string(),
            account_id: Some("acct_9".into()),
            prediction: 1,
            probability: 0.92,
            is_fake: true,
            confidence: 0.92,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&verdict).unwrap();
        let deserialized: AccountVerdict = serde_json::from_str(&json).unwrap();

        assert_eq!(verdict.verdict_id, deserialized.verdict_id);
        assert_eq!(deserialized.prediction, 1);
        assert!(deserialized.is_fake);
    }

    #[test]
    fn test_error_payload_has_no_result_fields() {
        let payload = ErrorPayload::new(None, "prediction failed: bad input");
        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("probability"));
        assert!(json.contains("prediction failed"));
    }
}
