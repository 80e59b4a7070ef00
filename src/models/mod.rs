//! Model components: scaling, classification, artifacts, inference

pub mod artifact;
pub mod classifier;
pub mod inference;
pub mod scaler;

pub use artifact::TrainedModel;
pub use classifier::{BinaryClassifier, LogisticRegression};
pub use inference::{InferenceEngine, PredictionResult};
pub use scaler::{NormalizationParameters, StandardScaler};
