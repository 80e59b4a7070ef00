//! Offline training driver: dataset load, stratified split, fit, evaluate,
//! bundle.
//!
//! Training is a batch process and never runs on the request path. A failed
//! run aborts before anything is persisted; a half-fitted model is never
//! saved.

use crate::config::TrainingConfig;
use crate::error::{DetectionError, Result};
use crate::features::{FeatureSchema, FeatureVectorBuilder};
use crate::models::artifact::TrainedModel;
use crate::models::classifier::{BinaryClassifier, LogisticRegression};
use crate::models::scaler::StandardScaler;
use crate::types::SyntheticAccount;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;
use tracing::info;

/// Evaluation metrics from the held-out split. Logged, never enforced.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub train_size: usize,
    pub test_size: usize,
    pub accuracy: f64,
    pub auc: f64,
    /// Per-class precision/recall/F1, indexed real then fake
    pub classes: [ClassMetrics; 2],
}

#[derive(Debug, Clone, Default)]
pub struct ClassMetrics {
    pub label: &'static str,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Read a generator-produced CSV dataset.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<SyntheticAccount>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        DetectionError::Dataset(format!("cannot open {}: {e}", path.display()))
    })?;

    let accounts: Vec<SyntheticAccount> = reader
        .deserialize()
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| DetectionError::Dataset(format!("corrupt row in {}: {e}", path.display())))?;

    info!(path = %path.display(), rows = accounts.len(), "Dataset loaded");
    Ok(accounts)
}

/// Batch trainer producing a validated [`TrainedModel`] bundle.
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Run the full training pipeline on a labeled corpus.
    pub fn train(&self, accounts: &[SyntheticAccount]) -> Result<(TrainedModel, TrainingReport)> {
        if accounts.is_empty() {
            return Err(DetectionError::Training("dataset is empty".to_string()));
        }

        let schema = FeatureSchema::default();
        let builder = FeatureVectorBuilder::new(schema.clone());

        let mut matrix = Vec::with_capacity(accounts.len());
        let mut labels = Vec::with_capacity(accounts.len());
        for account in accounts {
            matrix.push(builder.build(&account.to_record())?);
            labels.push(account.is_fake);
        }

        let (train_idx, test_idx) = stratified_split(
            &labels,
            self.config.test_fraction,
            self.config.split_seed,
        )?;

        info!(
            train = train_idx.len(),
            test = test_idx.len(),
            "Stratified split complete"
        );

        let train_matrix: Vec<Vec<f64>> = train_idx.iter().map(|&i| matrix[i].clone()).collect();
        let train_labels: Vec<u8> = train_idx.iter().map(|&i| labels[i]).collect();
        let test_matrix: Vec<Vec<f64>> = test_idx.iter().map(|&i| matrix[i].clone()).collect();
        let test_labels: Vec<u8> = test_idx.iter().map(|&i| labels[i]).collect();

        // Fit the scaler on the training split only
        let scaler = StandardScaler::fit(&train_matrix)?;
        let train_normalized = scaler.transform_matrix(&train_matrix)?;
        let test_normalized = scaler.transform_matrix(&test_matrix)?;

        let mut classifier = LogisticRegression::new(
            self.config.learning_rate,
            self.config.epochs,
            self.config.l2,
        );
        classifier.fit(&train_normalized, &train_labels)?;

        let report = evaluate(
            &classifier,
            &test_normalized,
            &test_labels,
            train_idx.len(),
        )?;
        log_report(&report);

        let model = TrainedModel::new(
            schema.names().to_vec(),
            scaler.params().clone(),
            classifier,
        );
        model.validate()?;

        Ok((model, report))
    }
}

/// Split indices 80/20 (or per config) preserving the label proportions in
/// both halves. Shuffling is seeded so runs are comparable.
fn stratified_split(
    labels: &[u8],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        return Err(DetectionError::Training(format!(
            "test fraction {test_fraction} must be in (0, 1)"
        )));
    }

    let mut positives: Vec<usize> = Vec::new();
    let mut negatives: Vec<usize> = Vec::new();
    for (i, &label) in labels.iter().enumerate() {
        if label == 1 {
            positives.push(i);
        } else {
            negatives.push(i);
        }
    }

    if positives.is_empty() || negatives.is_empty() {
        return Err(DetectionError::Training(
            "dataset contains a single class; stratified split impossible".to_string(),
        ));
    }

    // Each class must land on both sides of the split
    if positives.len() < 2 || negatives.len() < 2 {
        return Err(DetectionError::Training(format!(
            "class with {} sample(s) is too small for a stratified split",
            positives.len().min(negatives.len())
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    positives.shuffle(&mut rng);
    negatives.shuffle(&mut rng);

    let mut train = Vec::new();
    let mut test = Vec::new();
    for class in [&positives, &negatives] {
        let test_count = ((class.len() as f64) * test_fraction).round() as usize;
        let test_count = test_count.clamp(1, class.len() - 1);
        test.extend_from_slice(&class[..test_count]);
        train.extend_from_slice(&class[test_count..]);
    }

    Ok((train, test))
}

/// Compute held-out metrics for any classifier satisfying the capability.
fn evaluate<C: BinaryClassifier>(
    classifier: &C,
    test_matrix: &[Vec<f64>],
    test_labels: &[u8],
    train_size: usize,
) -> Result<TrainingReport> {
    let mut predictions = Vec::with_capacity(test_matrix.len());
    let mut scores = Vec::with_capacity(test_matrix.len());
    for row in test_matrix {
        predictions.push(classifier.predict(row)?);
        scores.push(classifier.predict_proba(row)?);
    }

    let correct = predictions
        .iter()
        .zip(test_labels.iter())
        .filter(|(p, l)| p == l)
        .count();
    let accuracy = correct as f64 / test_labels.len() as f64;

    let auc = roc_auc(&scores, test_labels);

    let classes = [
        class_metrics("real", 0, &predictions, test_labels),
        class_metrics("fake", 1, &predictions, test_labels),
    ];

    Ok(TrainingReport {
        train_size,
        test_size: test_labels.len(),
        accuracy,
        auc,
        classes,
    })
}

fn class_metrics(
    label: &'static str,
    class: u8,
    predictions: &[u8],
    truth: &[u8],
) -> ClassMetrics {
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    let mut support = 0usize;

    for (&p, &t) in predictions.iter().zip(truth.iter()) {
        if t == class {
            support += 1;
        }
        match (p == class, t == class) {
            (true, true) => tp += 1,
            (true, false) => fp += 1,
            (false, true) => fn_ += 1,
            (false, false) => {}
        }
    }

    let precision = if tp + fp > 0 {
        tp as f64 / (tp + fp) as f64
    } else {
        0.0
    };
    let recall = if tp + fn_ > 0 {
        tp as f64 / (tp + fn_) as f64
    } else {
        0.0
    };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    ClassMetrics {
        label,
        precision,
        recall,
        f1,
        support,
    }
}

/// Area under the ROC curve via the rank-sum formulation, with average
/// ranks for tied scores.
fn roc_auc(scores: &[f64], labels: &[u8]) -> f64 {
    let positives = labels.iter().filter(|&&l| l == 1).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return 0.5;
    }

    let mut indexed: Vec<(f64, u8)> = scores.iter().copied().zip(labels.iter().copied()).collect();
    indexed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut rank_sum = 0.0;
    let mut i = 0;
    while i < indexed.len() {
        let mut j = i;
        while j + 1 < indexed.len() && indexed[j + 1].0 == indexed[i].0 {
            j += 1;
        }
        // ranks are 1-based; ties share the average rank
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for item in &indexed[i..=j] {
            if item.1 == 1 {
                rank_sum += avg_rank;
            }
        }
        i = j + 1;
    }

    let p = positives as f64;
    let n = negatives as f64;
    (rank_sum - p * (p + 1.0) / 2.0) / (p * n)
}

fn log_report(report: &TrainingReport) {
    info!(
        train = report.train_size,
        test = report.test_size,
        accuracy = format!("{:.4}", report.accuracy),
        auc = format!("{:.4}", report.auc),
        "Evaluation complete"
    );
    for class in &report.classes {
        info!(
            class = class.label,
            precision = format!("{:.4}", class.precision),
            recall = format!("{:.4}", class.recall),
            f1 = format!("{:.4}", class.f1),
            support = class.support,
            "Classification report"
        );
    }
}
