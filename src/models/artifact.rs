//! Trained model bundle: schema + normalization + classifier as one unit

use crate::error::{DetectionError, Result};
use crate::models::classifier::LogisticRegression;
use crate::models::scaler::NormalizationParameters;
use std::fs;
use std::path::Path;
use tracing::info;

/// Current artifact format version. Bump on any change to the bundle layout
/// or the feature schema; old artifacts are rejected rather than migrated.
pub const ARTIFACT_VERSION: u32 = 1;

/// The three fitted pieces that must always travel together. A classifier
/// paired with mismatched normalization parameters or a reordered schema
/// silently corrupts predictions, so [`validate`](TrainedModel::validate)
/// cross-checks the dimensions and runs on every load.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TrainedModel {
    pub version: u32,
    /// Feature name ordering the model was fitted with
    pub schema: Vec<String>,
    pub normalization: NormalizationParameters,
    pub classifier: LogisticRegression,
}

impl TrainedModel {
    pub fn new(
        schema: Vec<String>,
        normalization: NormalizationParameters,
        classifier: LogisticRegression,
    ) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            schema,
            normalization,
            classifier,
        }
    }

    /// Internal consistency check: schema, scaler, and classifier must all
    /// agree on dimensionality, and the version must be current.
    pub fn validate(&self) -> Result<()> {
        if self.version != ARTIFACT_VERSION {
            return Err(DetectionError::ArtifactLoad(format!(
                "artifact version {} is not supported (expected {})",
                self.version, ARTIFACT_VERSION
            )));
        }

        let schema_len = self.schema.len();
        if schema_len == 0 {
            return Err(DetectionError::ArtifactLoad(
                "artifact has an empty feature schema".to_string(),
            ));
        }

        let norm_dim = self.normalization.dimension();
        if norm_dim != schema_len || self.normalization.std_dev.len() != schema_len {
            return Err(DetectionError::ArtifactLoad(format!(
                "normalization dimensionality {} does not match schema length {}",
                norm_dim, schema_len
            )));
        }

        let clf_dim = self.classifier.dimension();
        if clf_dim != schema_len {
            return Err(DetectionError::ArtifactLoad(format!(
                "classifier dimensionality {} does not match schema length {}",
                clf_dim, schema_len
            )));
        }

        Ok(())
    }

    /// Persist the bundle as JSON. Written to a temporary sibling first and
    /// renamed, so a crashed save never leaves a half-written artifact.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.validate()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| DetectionError::ArtifactLoad(format!("serialization failed: {e}")))?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, path)?;

        info!(path = %path.display(), features = self.schema.len(), "Model artifact saved");
        Ok(())
    }

    /// Load and validate a bundle.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let bytes = fs::read(path).map_err(|e| {
            DetectionError::ArtifactLoad(format!("cannot read {}: {e}", path.display()))
        })?;

        let model: TrainedModel = serde_json::from_slice(&bytes).map_err(|e| {
            DetectionError::ArtifactLoad(format!("corrupt artifact {}: {e}", path.display()))
        })?;

        model.validate()?;

        info!(path = %path.display(), features = model.schema.len(), "Model artifact loaded");
        Ok(model)
    }
}
