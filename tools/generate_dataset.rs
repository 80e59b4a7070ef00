//! Synthetic Dataset Generator
//!
//! Generates a labeled synthetic account dataset and writes it to CSV
//! for model training.

use anyhow::Result;
use chrono::NaiveDate;
use fake_account_pipeline::config::AppConfig;
use fake_account_pipeline::generator::SyntheticDataGenerator;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("generate_dataset=info".parse()?)
                .add_directive("fake_account_pipeline=info".parse()?),
        )
        .init();

    info!("Starting Synthetic Dataset Generator");

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Config file not loaded, using defaults");
        AppConfig::default()
    });

    // Parse arguments, falling back to the [generator] config section
    let args: Vec<String> = std::env::args().collect();
    let output_path = args.get(1).cloned().unwrap_or(config.generator.output_path);
    let samples: usize = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.generator.samples);
    let seed: u64 = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.generator.seed);
    // Anchor for created_date; pin it to reproduce a dataset byte-for-byte
    // across days
    let reference_date: Option<NaiveDate> = args
        .get(4)
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| anyhow::anyhow!("invalid reference date `{s}`: {e}"))
        })
        .transpose()?;

    info!(
        output_path = %output_path,
        samples = samples,
        seed = seed,
        reference_date = reference_date.map(|d| d.to_string()).as_deref().unwrap_or("today"),
        "Configuration loaded"
    );

    let mut generator = SyntheticDataGenerator::new(seed);
    if let Some(date) = reference_date {
        generator = generator.with_reference_date(date);
    }
    let accounts = generator.write_csv(samples, &output_path)?;

    let fake_count = accounts.iter().filter(|a| a.is_fake == 1).count();
    info!(
        total = accounts.len(),
        fake = fake_count,
        real = accounts.len() - fake_count,
        fake_rate = format!("{:.1}%", (fake_count as f64 / accounts.len() as f64) * 100.0),
        "Completed"
    );

    Ok(())
}
