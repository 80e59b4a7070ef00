//! Model Trainer
//!
//! Trains the fake account classifier on a generated CSV dataset and saves
//! the bundled artifact for the scoring service.

use anyhow::{Context, Result};
use fake_account_pipeline::config::AppConfig;
use fake_account_pipeline::training::{load_dataset, Trainer};
use tracing::{info, warn};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("train_model=info".parse()?)
                .add_directive("fake_account_pipeline=info".parse()?),
        )
        .init();

    info!("Starting Model Trainer");

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Config file not loaded, using defaults");
        AppConfig::default()
    });

    // Parse arguments, falling back to the [training] and [model] sections
    let args: Vec<String> = std::env::args().collect();
    let dataset_path = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| config.training.dataset_path.clone());
    let artifact_path = args.get(2).cloned().unwrap_or(config.model.artifact_path);

    info!(
        dataset_path = %dataset_path,
        artifact_path = %artifact_path,
        epochs = config.training.epochs,
        learning_rate = config.training.learning_rate,
        "Configuration loaded"
    );

    let accounts = load_dataset(&dataset_path)
        .with_context(|| format!("failed to load dataset from {dataset_path}"))?;

    let trainer = Trainer::new(config.training);
    let (model, report) = trainer
        .train(&accounts)
        .context("training failed; artifact not written")?;

    info!(
        accuracy = format!("{:.4}", report.accuracy),
        auc = format!("{:.4}", report.auc),
        "Training complete"
    );

    model
        .save(&artifact_path)
        .with_context(|| format!("failed to save model to {artifact_path}"))?;
    info!(path = %artifact_path, "Model artifact saved");

    Ok(())
}
