//! Configuration management for the fake account detection pipeline

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub model: ModelConfig,
    pub training: TrainingConfig,
    pub generator: GeneratorConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming score requests
    pub account_subject: String,
    /// Subject for outgoing verdicts and error payloads
    pub verdict_subject: String,
    /// Queue group shared by scoring-service instances; when set, each
    /// request is delivered to exactly one instance
    #[serde(default)]
    pub queue_group: Option<String>,
}

/// Trained model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the trained model bundle
    pub artifact_path: String,
}

/// Training configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Dataset CSV consumed by the trainer
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,
    /// Held-out fraction for evaluation
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Seed for the stratified split shuffle
    #[serde(default = "default_split_seed")]
    pub split_seed: u64,
    /// Gradient descent step size
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Gradient descent passes over the training split
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    /// L2 regularization strength
    #[serde(default = "default_l2")]
    pub l2: f64,
}

/// Synthetic dataset generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Number of accounts to generate
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Seed for the generator stream
    #[serde(default = "default_generator_seed")]
    pub seed: u64,
    /// Where the dataset CSV is written
    #[serde(default = "default_dataset_path")]
    pub output_path: String,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of parallel scoring workers
    pub workers: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

fn default_dataset_path() -> String {
    "data/synthetic_accounts.csv".to_string()
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_split_seed() -> u64 {
    42
}

fn default_learning_rate() -> f64 {
    0.1
}

fn default_epochs() -> usize {
    300
}

fn default_l2() -> f64 {
    1e-4
}

fn default_samples() -> usize {
    10_000
}

fn default_generator_seed() -> u64 {
    42
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                account_subject: "accounts.check".to_string(),
                verdict_subject: "accounts.verdicts".to_string(),
                queue_group: None,
            },
            model: ModelConfig::default(),
            training: TrainingConfig::default(),
            generator: GeneratorConfig::default(),
            pipeline: PipelineConfig { workers: 4 },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: "models/fake_account_detector.json".to_string(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            test_fraction: default_test_fraction(),
            split_seed: default_split_seed(),
            learning_rate: default_learning_rate(),
            epochs: default_epochs(),
            l2: default_l2(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            seed: default_generator_seed(),
            output_path: default_dataset_path(),
        }
    }
}
