//! Account data structures for fake account detection

use crate::error::{DetectionError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Sparse account record as supplied by a caller.
///
/// Keys are feature names; any subset may be present and extra keys are
/// ignored downstream. Values arrive as JSON and are coerced to numbers on
/// access: numbers pass through, booleans map to 0/1, and numeric strings
/// (form fields) are parsed. Anything else is a validation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountRecord {
    pub fields: HashMap<String, Value>,
}

impl AccountRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a numeric field, replacing any existing value.
    pub fn set(&mut self, name: &str, value: f64) {
        self.fields.insert(name.to_string(), Value::from(value));
    }

    /// Builder-style variant of [`set`](Self::set) for tests and tools.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    /// Coerce the named field to a number.
    ///
    /// Returns `Ok(None)` when the field is absent; missing fields are the
    /// builder's business, not an error here.
    pub fn numeric(&self, name: &str) -> Result<Option<f64>> {
        let value = match self.fields.get(name) {
            Some(v) => v,
            None => return Ok(None),
        };

        let number = match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| DetectionError::validation(name, "number out of f64 range"))?,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
                DetectionError::validation(name, format!("cannot parse `{}` as a number", s))
            })?,
            other => {
                return Err(DetectionError::validation(
                    name,
                    format!("expected a number, got {}", type_name(other)),
                ))
            }
        };

        if !number.is_finite() {
            return Err(DetectionError::validation(name, "value is not finite"));
        }

        Ok(Some(number))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Incoming scoring request: an optional account identifier plus the sparse
/// record itself. Unknown keys land in the record and are ignored by the
/// feature builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    #[serde(flatten)]
    pub record: AccountRecord,
}

/// Fully populated labeled account emitted by the synthetic generator.
///
/// Field order matches the dataset CSV column order: username, label, the 17
/// schema features, the two extra profile flags, and the creation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticAccount {
    pub username: String,
    pub is_fake: u8,
    pub account_age_days: u32,
    pub followers: u64,
    pub following: u64,
    pub posts_count: u64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    pub avg_shares: f64,
    pub has_profile_pic: u8,
    pub has_bio: u8,
    pub has_location: u8,
    pub verified: u8,
    pub has_website: u8,
    pub has_pinned_posts: u8,
    pub followers_following_ratio: f64,
    pub engagement_rate: f64,
    pub suspicious_username: u8,
    pub low_activity: u8,
    pub high_follower_ratio: u8,
    pub low_engagement: u8,
    pub created_date: NaiveDate,
}

impl SyntheticAccount {
    /// Convert to a sparse record for the feature builder.
    ///
    /// The generator's own derived values are carried along; the builder
    /// recomputes them whenever the denominators allow, so training and
    /// inference see the same derivation path.
    pub fn to_record(&self) -> AccountRecord {
        let mut record = AccountRecord::new();
        record.set("account_age_days", self.account_age_days as f64);
        record.set("followers", self.followers as f64);
        record.set("following", self.following as f64);
        record.set("posts_count", self.posts_count as f64);
        record.set("avg_likes", self.avg_likes);
        record.set("avg_comments", self.avg_comments);
        record.set("avg_shares", self.avg_shares);
        record.set("has_profile_pic", self.has_profile_pic as f64);
        record.set("has_bio", self.has_bio as f64);
        record.set("has_location", self.has_location as f64);
        record.set("verified", self.verified as f64);
        record.set("followers_following_ratio", self.followers_following_ratio);
        record.set("engagement_rate", self.engagement_rate);
        record.set("suspicious_username", self.suspicious_username as f64);
        record.set("low_activity", self.low_activity as f64);
        record.set("high_follower_ratio", self.high_follower_ratio as f64);
        record.set("low_engagement", self.low_engagement as f64);
        record
    }
}
