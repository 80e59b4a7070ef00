//! Error types for the detection pipeline

use thiserror::Error;

/// Failure kinds surfaced by the pipeline components.
///
/// Builder and scaler return the specific variants; the inference engine
/// wraps anything it hits into `PredictionFailed` so callers never see a
/// partial result.
#[derive(Debug, Error)]
pub enum DetectionError {
    /// A supplied field value could not be coerced to a number
    #[error("invalid value for feature `{feature}`: {message}")]
    Validation { feature: String, message: String },

    /// Vector length disagrees with the fitted dimensionality
    #[error("feature vector has length {actual}, fitted dimensionality is {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Trained model bundle missing, corrupt, or internally inconsistent
    #[error("model artifact error: {0}")]
    ArtifactLoad(String),

    /// Training run cannot produce a usable model
    #[error("training failed: {0}")]
    Training(String),

    /// Dataset file cannot be written or parsed
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Umbrella failure returned to scoring callers
    #[error("prediction failed: {0}")]
    PredictionFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DetectionError>;

impl DetectionError {
    /// Helper for builder validation failures.
    pub fn validation(feature: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            feature: feature.to_string(),
            message: message.into(),
        }
    }

    /// Wrap any upstream error as the caller-facing prediction failure.
    pub fn into_prediction_failure(self) -> Self {
        match self {
            Self::PredictionFailed(_) => self,
            other => Self::PredictionFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DetectionError::ShapeMismatch {
            expected: 17,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "feature vector has length 12, fitted dimensionality is 17"
        );
    }

    #[test]
    fn test_prediction_failure_wrapping() {
        let err = DetectionError::validation("followers", "not a number");
        let wrapped = err.into_prediction_failure();
        assert!(matches!(wrapped, DetectionError::PredictionFailed(_)));
        assert!(wrapped.to_string().contains("followers"));

        // Already-wrapped errors are not double-wrapped
        let err = DetectionError::PredictionFailed("boom".to_string());
        let wrapped = err.into_prediction_failure();
        assert_eq!(wrapped.to_string(), "prediction failed: boom");
    }
}
