//! Fake Account Detection Pipeline Library
//!
//! Scores social-media accounts as fake or real from profile and activity
//! signals. A seeded synthetic generator produces the labeled training
//! corpus; the trained bundle (schema + scaler + classifier) serves scoring
//! requests as an immutable snapshot.

pub mod config;
pub mod consumer;
pub mod error;
pub mod features;
pub mod generator;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod training;
pub mod types;

pub use config::AppConfig;
pub use consumer::AccountConsumer;
pub use error::DetectionError;
pub use features::{FeatureSchema, FeatureVectorBuilder};
pub use generator::SyntheticDataGenerator;
pub use models::{InferenceEngine, PredictionResult, TrainedModel};
pub use producer::VerdictProducer;
pub use training::Trainer;
pub use types::{AccountRecord, AccountVerdict, ScoreRequest, SyntheticAccount};
