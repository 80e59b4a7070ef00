//! Feature schema and vector construction for fake account detection.
//!
//! The schema is a single fixed ordering shared by training and inference.
//! A fitted scaler and classifier are only valid for this exact ordering;
//! adding, removing, or reordering features requires retraining.

use crate::error::Result;
use crate::types::AccountRecord;

/// Fixed feature ordering. Index in this array == index in every vector.
pub const FEATURE_NAMES: [&str; 17] = [
    "account_age_days",
    "followers",
    "following",
    "posts_count",
    "avg_likes",
    "avg_comments",
    "avg_shares",
    "has_profile_pic",
    "has_bio",
    "has_location",
    "verified",
    "followers_following_ratio",
    "engagement_rate",
    "suspicious_username",
    "low_activity",
    "high_follower_ratio",
    "low_engagement",
];

/// Number of features in the schema.
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Default value used when a field is absent from a record, keyed by feature
/// name. All defaults are currently zero, but the table is explicit so that
/// each field's missing-value behavior is pinned by a test.
pub const FEATURE_DEFAULTS: [(&str, f64); FEATURE_COUNT] = [
    ("account_age_days", 0.0),
    ("followers", 0.0),
    ("following", 0.0),
    ("posts_count", 0.0),
    ("avg_likes", 0.0),
    ("avg_comments", 0.0),
    ("avg_shares", 0.0),
    ("has_profile_pic", 0.0),
    ("has_bio", 0.0),
    ("has_location", 0.0),
    ("verified", 0.0),
    ("followers_following_ratio", 0.0),
    ("engagement_rate", 0.0),
    ("suspicious_username", 0.0),
    ("low_activity", 0.0),
    ("high_follower_ratio", 0.0),
    ("low_engagement", 0.0),
];

/// Ordered feature name list carried inside a trained model bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Position of a feature name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Build from a stored name list (e.g. a loaded artifact).
    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// Builds a dense schema-ordered vector from a sparse account record.
///
/// Missing fields take their default from [`FEATURE_DEFAULTS`]; the two
/// derived features are recomputed from the raw counts whenever their
/// denominators are positive, even if the caller supplied them.
#[derive(Debug, Clone, Default)]
pub struct FeatureVectorBuilder {
    schema: FeatureSchema,
}

impl FeatureVectorBuilder {
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Build the dense feature vector for one record.
    ///
    /// Fails only on unparseable supplied values; missing keys are not an
    /// error.
    pub fn build(&self, record: &AccountRecord) -> Result<Vec<f64>> {
        let mut vector = Vec::with_capacity(self.schema.len());

        for name in self.schema.names() {
            let value = match record.numeric(name)? {
                Some(v) => v,
                None => default_for(name),
            };
            vector.push(value);
        }

        // Derived overwrites. When a denominator is zero the step-1 value
        // (default or caller-supplied) is retained; the generator floors the
        // denominator at 1 instead, see generator.rs.
        let followers = record.numeric("followers")?.unwrap_or(0.0);
        let following = record.numeric("following")?.unwrap_or(0.0);

        if following > 0.0 {
            if let Some(idx) = self.schema.index_of("followers_following_ratio") {
                vector[idx] = followers / following;
            }
        }

        if followers > 0.0 {
            if let Some(idx) = self.schema.index_of("engagement_rate") {
                let likes = record.numeric("avg_likes")?.unwrap_or(0.0);
                let comments = record.numeric("avg_comments")?.unwrap_or(0.0);
                let shares = record.numeric("avg_shares")?.unwrap_or(0.0);
                vector[idx] = (likes + comments + shares) / followers;
            }
        }

        Ok(vector)
    }
}

/// Default value for a schema feature. Unknown names fall back to zero.
pub fn default_for(name: &str) -> f64 {
    FEATURE_DEFAULTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| *v)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> FeatureVectorBuilder {
        FeatureVectorBuilder::new(FeatureSchema::default())
    }

    #[test]
    fn test_empty_record_yields_full_default_vector() {
        let vector = builder().build(&AccountRecord::new()).unwrap();
        assert_eq!(vector.len(), FEATURE_COUNT);
        assert!(vector.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_defaults_per_field() {
        // Every schema name has an entry in the default table
        for name in FEATURE_NAMES {
            assert!(
                FEATURE_DEFAULTS.iter().any(|(n, _)| *n == name),
                "no default for {name}"
            );
            assert_eq!(default_for(name), 0.0);
        }
    }

    #[test]
    fn test_vector_order_is_schema_order() {
        let record = AccountRecord::new()
            .with("account_age_days", 900.0)
            .with("verified", 1.0);
        let vector = builder().build(&record).unwrap();

        assert_eq!(vector[0], 900.0);
        let verified_idx = FEATURE_NAMES.iter().position(|n| *n == "verified").unwrap();
        assert_eq!(vector[verified_idx], 1.0);
    }

    #[test]
    fn test_ratio_derived_when_following_positive() {
        let record = AccountRecord::new()
            .with("followers", 1000.0)
            .with("following", 10.0)
            // Supplied value must be overwritten
            .with("followers_following_ratio", 3.0);
        let vector = builder().build(&record).unwrap();

        let idx = FEATURE_NAMES
            .iter()
            .position(|n| *n == "followers_following_ratio")
            .unwrap();
        assert_eq!(vector[idx], 100.0);
    }

    #[test]
    fn test_ratio_not_derived_when_following_zero() {
        let idx = FEATURE_NAMES
            .iter()
            .position(|n| *n == "followers_following_ratio")
            .unwrap();

        // Default retained
        let record = AccountRecord::new().with("followers", 1000.0);
        let vector = builder().build(&record).unwrap();
        assert_eq!(vector[idx], 0.0);

        // Supplied value retained
        let record = AccountRecord::new()
            .with("followers", 1000.0)
            .with("following", 0.0)
            .with("followers_following_ratio", 42.0);
        let vector = builder().build(&record).unwrap();
        assert_eq!(vector[idx], 42.0);
    }

    #[test]
    fn test_engagement_rate_derived_when_followers_positive() {
        let record = AccountRecord::new()
            .with("followers", 100.0)
            .with("avg_likes", 20.0)
            .with("avg_comments", 5.0)
            .with("avg_shares", 2.0);
        let vector = builder().build(&record).unwrap();

        let idx = FEATURE_NAMES
            .iter()
            .position(|n| *n == "engagement_rate")
            .unwrap();
        assert!((vector[idx] - 0.27).abs() < 1e-12);
    }

    #[test]
    fn test_engagement_rate_not_derived_when_followers_zero() {
        let record = AccountRecord::new()
            .with("avg_likes", 20.0)
            .with("engagement_rate", 0.5);
        let vector = builder().build(&record).unwrap();

        let idx = FEATURE_NAMES
            .iter()
            .position(|n| *n == "engagement_rate")
            .unwrap();
        assert_eq!(vector[idx], 0.5);
    }

    #[test]
    fn test_non_numeric_field_fails_validation() {
        let mut record = AccountRecord::new();
        record
            .fields
            .insert("followers".into(), serde_json::Value::String("many".into()));

        let err = builder().build(&record).unwrap_err();
        assert!(matches!(
            err,
            crate::error::DetectionError::Validation { .. }
        ));
    }
}
