//! Fake Account Detection Pipeline - Scoring Service
//!
//! Consumes account score requests from NATS, runs the fitted inference
//! pipeline, and publishes verdicts. Supports parallel scoring for high
//! throughput.

use anyhow::{Context, Result};
use fake_account_pipeline::{
    config::AppConfig,
    consumer::AccountConsumer,
    metrics::{MetricsReporter, PipelineMetrics},
    models::InferenceEngine,
    producer::VerdictProducer,
    types::{ErrorPayload, ScoreRequest},
};
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fake_account_pipeline=info".parse()?),
        )
        .init();

    info!("Starting Fake Account Scoring Service");

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");

    // Load the trained model; refuse to serve without a valid artifact
    let engine = Arc::new(
        InferenceEngine::from_artifact(&config.model.artifact_path).with_context(|| {
            format!(
                "no usable model at {}; run generate-dataset and train-model first",
                config.model.artifact_path
            )
        })?,
    );
    info!(
        "Inference engine initialized ({} features)",
        engine.feature_count()
    );

    // Initialize metrics
    let metrics = Arc::new(PipelineMetrics::new());

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    // Initialize consumer and producer
    let consumer = AccountConsumer::new(
        client.clone(),
        &config.nats.account_subject,
        config.nats.queue_group.clone(),
    );
    let producer = Arc::new(VerdictProducer::new(
        client.clone(),
        &config.nats.verdict_subject,
    ));

    let num_workers = config.pipeline.workers;
    info!(
        "Starting scoring loop with {} parallel workers",
        num_workers
    );
    info!("Listening on subject: {}", config.nats.account_subject);
    info!("Publishing verdicts to: {}", config.nats.verdict_subject);

    // Semaphore to limit concurrent processing
    let semaphore = Arc::new(Semaphore::new(num_workers));
    let processed_count = Arc::new(AtomicU64::new(0));

    // Start metrics reporter (prints summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Score requests in parallel
    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        // Acquire permit (limits concurrent tasks)
        let permit = semaphore.clone().acquire_owned().await?;

        // Clone shared resources for the spawned task
        let engine = engine.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();
        let processed_count = processed_count.clone();

        // Spawn task to score this account
        tokio::spawn(async move {
            let start_time = Instant::now();

            match serde_json::from_slice::<ScoreRequest>(&message.payload) {
                Ok(request) => {
                    let account_id = request.account_id.clone();

                    match engine.predict(&request.record) {
                        Ok(result) => {
                            let processing_time = start_time.elapsed();
                            metrics.record_prediction(
                                processing_time,
                                result.probability,
                                result.is_fake,
                            );

                            let verdict = result.to_verdict(account_id.clone());
                            if let Err(e) = producer.publish(&verdict).await {
                                error!(
                                    account_id = ?account_id,
                                    error = %e,
                                    "Failed to publish verdict"
                                );
                            } else {
                                debug!(
                                    account_id = ?account_id,
                                    is_fake = result.is_fake,
                                    probability = result.probability,
                                    confidence = result.confidence,
                                    processing_time_us = processing_time.as_micros(),
                                    "Verdict published"
                                );
                            }

                            let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;

                            // Log progress every 100 accounts
                            if count % 100 == 0 {
                                let throughput = metrics.get_throughput();
                                let processing_stats = metrics.get_processing_stats();
                                info!(
                                    processed = count,
                                    throughput = format!("{:.1}/s", throughput),
                                    avg_latency_us = processing_stats.mean_us,
                                    "Scoring milestone"
                                );
                            }
                        }
                        Err(e) => {
                            metrics.record_failure();
                            error!(
                                account_id = ?account_id,
                                error = %e,
                                "Prediction failed"
                            );

                            let payload = ErrorPayload::new(account_id, e.to_string());
                            if let Err(e) = producer.publish_error(&payload).await {
                                error!(error = %e, "Failed to publish error payload");
                            }
                        }
                    }
                }
                Err(e) => {
                    metrics.record_failure();
                    warn!(error = %e, "Failed to deserialize score request");
                }
            }

            // Release permit when done
            drop(permit);
        });
    }

    // Print final summary
    info!("Scoring service shutting down...");
    metrics.print_summary();

    Ok(())
}
