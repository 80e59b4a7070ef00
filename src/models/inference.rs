//! Inference engine: builder → scaler → classifier → decision

use crate::error::{DetectionError, Result};
use crate::features::{FeatureSchema, FeatureVectorBuilder};
use crate::models::artifact::TrainedModel;
use crate::models::classifier::{BinaryClassifier, LogisticRegression};
use crate::models::scaler::StandardScaler;
use crate::types::{AccountRecord, AccountVerdict};
use chrono::Utc;
use std::path::Path;
use tracing::{debug, info};

/// Result of scoring one account.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PredictionResult {
    /// Predicted class (0 = real, 1 = fake)
    pub prediction: u8,
    /// Probability of the fake class
    pub probability: f64,
    /// prediction != 0
    pub is_fake: bool,
    /// max(probability, 1 - probability), always in [0.5, 1.0]
    pub confidence: f64,
}

impl PredictionResult {
    /// Attach identity and timestamp for publication.
    pub fn to_verdict(&self, account_id: Option<String>) -> AccountVerdict {
        AccountVerdict {
            verdict_id: uuid::Uuid::new_v4().to_string(),
            account_id,
            prediction: self.prediction,
            probability: self.probability,
            is_fake: self.is_fake,
            confidence: self.confidence,
            timestamp: Utc::now(),
        }
    }
}

/// Scores account records against an immutable fitted model.
///
/// Holds the three fitted pieces unpacked from a validated [`TrainedModel`]
/// snapshot. The engine never mutates them, so one instance can serve
/// concurrent calls; hot reload is a whole-engine swap, never a partial
/// update.
#[derive(Debug)]
pub struct InferenceEngine {
    builder: FeatureVectorBuilder,
    scaler: StandardScaler,
    classifier: LogisticRegression,
}

impl InferenceEngine {
    /// Build an engine from a trained model bundle. The bundle's internal
    /// consistency check runs first so a skewed artifact never serves.
    pub fn new(model: TrainedModel) -> Result<Self> {
        model.validate()?;

        let schema = FeatureSchema::from_names(model.schema);
        info!(features = schema.len(), "Inference engine initialized");

        Ok(Self {
            builder: FeatureVectorBuilder::new(schema),
            scaler: StandardScaler::from_params(model.normalization),
            classifier: model.classifier,
        })
    }

    /// Load the artifact at `path` and build an engine from it.
    pub fn from_artifact<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(TrainedModel::load(path)?)
    }

    pub fn feature_count(&self) -> usize {
        self.builder.schema().len()
    }

    /// Score one account record.
    ///
    /// Pure function of the record and the fitted artifacts. Any upstream
    /// failure (validation, shape mismatch) is wrapped into a single
    /// `PredictionFailed` outcome; no partial result is ever returned.
    pub fn predict(&self, record: &AccountRecord) -> Result<PredictionResult> {
        self.predict_inner(record)
            .map_err(DetectionError::into_prediction_failure)
    }

    fn predict_inner(&self, record: &AccountRecord) -> Result<PredictionResult> {
        let vector = self.builder.build(record)?;
        let normalized = self.scaler.transform(&vector)?;

        let probability = self.classifier.predict_proba(&normalized)?;
        let prediction = self.classifier.predict(&normalized)?;

        let result = PredictionResult {
            prediction,
            probability,
            is_fake: prediction != 0,
            confidence: probability.max(1.0 - probability),
        };

        debug!(
            prediction = result.prediction,
            probability = result.probability,
            confidence = result.confidence,
            "Account scored"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FEATURE_COUNT, FEATURE_NAMES};
    use crate::models::scaler::NormalizationParameters;

    /// Engine with identity normalization and hand-set weights: positive
    /// weight on `suspicious_username`, nothing else.
    fn hand_built_engine(bias: f64) -> InferenceEngine {
        let schema: Vec<String> = FEATURE_NAMES.iter().map(|n| n.to_string()).collect();
        let normalization = NormalizationParameters {
            mean: vec![0.0; FEATURE_COUNT],
            std_dev: vec![1.0; FEATURE_COUNT],
        };

        let mut classifier = LogisticRegression::default();
        classifier.weights = vec![0.0; FEATURE_COUNT];
        let idx = FEATURE_NAMES
            .iter()
            .position(|n| *n == "suspicious_username")
            .unwrap();
        classifier.weights[idx] = 4.0;
        classifier.bias = bias;

        InferenceEngine::new(TrainedModel::new(schema, normalization, classifier)).unwrap()
    }

    #[test]
    fn test_predict_composes_pipeline() {
        let engine = hand_built_engine(-2.0);

        let fake = AccountRecord::new().with("suspicious_username", 1.0);
        let result = engine.predict(&fake).unwrap();
        assert_eq!(result.prediction, 1);
        assert!(result.is_fake);
        assert!(result.probability > 0.5);

        let real = AccountRecord::new();
        let result = engine.predict(&real).unwrap();
        assert_eq!(result.prediction, 0);
        assert!(!result.is_fake);
    }

    #[test]
    fn test_confidence_invariant() {
        for bias in [-3.0, -0.4, 0.0, 0.4, 3.0] {
            let engine = hand_built_engine(bias);
            let result = engine.predict(&AccountRecord::new()).unwrap();

            let expected = result.probability.max(1.0 - result.probability);
            assert_eq!(result.confidence, expected);
            assert!(result.confidence >= 0.5 && result.confidence <= 1.0);
        }
    }

    #[test]
    fn test_validation_error_surfaces_as_prediction_failure() {
        let engine = hand_built_engine(0.0);

        let mut record = AccountRecord::new();
        record
            .fields
            .insert("followers".into(), serde_json::Value::String("nope".into()));

        let err = engine.predict(&record).unwrap_err();
        assert!(matches!(err, DetectionError::PredictionFailed(_)));
        assert!(err.to_string().contains("followers"));
    }

    #[test]
    fn test_inconsistent_bundle_is_rejected() {
        let schema: Vec<String> = FEATURE_NAMES.iter().map(|n| n.to_string()).collect();
        let normalization = NormalizationParameters {
            mean: vec![0.0; FEATURE_COUNT - 1],
            std_dev: vec![1.0; FEATURE_COUNT - 1],
        };
        let classifier = LogisticRegression::default();

        let err =
            InferenceEngine::new(TrainedModel::new(schema, normalization, classifier)).unwrap_err();
        assert!(matches!(err, DetectionError::ArtifactLoad(_)));
    }

    #[test]
    fn test_verdict_carries_result_fields() {
        let engine = hand_built_engine(1.0);
        let result = engine.predict(&AccountRecord::new()).unwrap();
        let verdict = result.to_verdict(Some("acct_1".into()));

        assert_eq!(verdict.account_id.as_deref(), Some("acct_1"));
        assert_eq!(verdict.prediction, result.prediction);
        assert_eq!(verdict.probability, result.probability);
        assert_eq!(verdict.confidence, result.confidence);
    }
}
