//! Performance metrics and statistics tracking for the scoring service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the scoring pipeline
pub struct PipelineMetrics {
    /// Total accounts scored
    pub accounts_scored: AtomicU64,
    /// Total fake verdicts
    pub fake_verdicts: AtomicU64,
    /// Total failed predictions
    pub failures: AtomicU64,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Fake-probability distribution buckets
    score_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PipelineMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            accounts_scored: AtomicU64::new(0),
            fake_verdicts: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a scored account
    pub fn record_prediction(&self, processing_time: Duration, probability: f64, is_fake: bool) {
        self.accounts_scored.fetch_add(1, Ordering::Relaxed);
        if is_fake {
            self.fake_verdicts.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the recent window for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = (probability * 10.0).min(9.0) as usize;
        if let Ok(mut buckets) = self.score_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a failed prediction
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = self.processing_times.read().unwrap();
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (accounts per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.accounts_scored.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get fake-probability distribution
    pub fn get_score_distribution(&self) -> [u64; 10] {
        *self.score_buckets.read().unwrap()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let scored = self.accounts_scored.load(Ordering::Relaxed);
        let fakes = self.fake_verdicts.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let fake_rate = if scored > 0 {
            (fakes as f64 / scored as f64) * 100.0
        } else {
            0.0
        };

        let processing = self.get_processing_stats();
        let throughput = self.get_throughput();
        let score_dist = self.get_score_distribution();

        info!(
            scored = scored,
            fake_verdicts = fakes,
            fake_rate = format!("{:.1}%", fake_rate),
            failures = failures,
            throughput = format!("{:.1}/s", throughput),
            "Scoring summary"
        );
        info!(
            mean_us = processing.mean_us,
            p50_us = processing.p50_us,
            p95_us = processing.p95_us,
            p99_us = processing.p99_us,
            "Processing time"
        );

        let total: u64 = score_dist.iter().sum();
        for (i, &count) in score_dist.iter().enumerate() {
            let pct = if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            info!(
                bucket = format!("{:.1}-{:.1}", i as f64 / 10.0, (i + 1) as f64 / 10.0),
                count = count,
                pct = format!("{:.1}%", pct),
                "Fake-probability distribution"
            );
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<PipelineMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<PipelineMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PipelineMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), 0.9, true);
        metrics.record_prediction(Duration::from_micros(200), 0.2, false);
        metrics.record_failure();

        assert_eq!(metrics.accounts_scored.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.fake_verdicts.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.failures.load(Ordering::Relaxed), 1);

        let dist = metrics.get_score_distribution();
        assert_eq!(dist[9], 1);
        assert_eq!(dist[2], 1);
    }

    #[test]
    fn test_processing_stats() {
        let metrics = PipelineMetrics::new();
        for us in [100, 200, 300, 400, 500] {
            metrics.record_prediction(Duration::from_micros(us), 0.5, false);
        }

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean_us, 300);
        assert_eq!(stats.max_us, 500);
    }
}
