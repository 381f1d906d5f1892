//! Counters and timing statistics for fraud checks.

use crate::types::verdict::Verdict;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector shared by all submissions
pub struct CheckMetrics {
    /// Transactions that reached the scorer
    pub checks: AtomicU64,
    /// Verdicts flagged as fraud
    pub fraudulent: AtomicU64,
    /// Verdicts cleared as legitimate
    pub legitimate: AtomicU64,
    /// Submissions rejected by validation
    pub rejected: AtomicU64,
    /// Check times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    start_time: Instant,
}

impl CheckMetrics {
    pub fn new() -> Self {
        Self {
            checks: AtomicU64::new(0),
            fraudulent: AtomicU64::new(0),
            legitimate: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a scored transaction
    pub fn record_check(&self, processing_time: Duration, verdict: Verdict) {
        self.checks.fetch_add(1, Ordering::Relaxed);
        match verdict {
            Verdict::Fraudulent => self.fraudulent.fetch_add(1, Ordering::Relaxed),
            Verdict::Legitimate => self.legitimate.fetch_add(1, Ordering::Relaxed),
        };

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the most recent samples
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Record a submission rejected before scoring
    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get check time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let Ok(times) = self.processing_times.read() else {
            return ProcessingStats::default();
        };
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p99_us: sorted[((count as f64 * 0.99) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    /// Share of scored transactions flagged as fraud, in percent
    pub fn fraud_rate(&self) -> f64 {
        let checks = self.checks.load(Ordering::Relaxed);
        if checks == 0 {
            return 0.0;
        }
        self.fraudulent.load(Ordering::Relaxed) as f64 / checks as f64 * 100.0
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let processing = self.get_processing_stats();
        info!(
            uptime_secs = self.uptime().as_secs(),
            checks = self.checks.load(Ordering::Relaxed),
            fraudulent = self.fraudulent.load(Ordering::Relaxed),
            legitimate = self.legitimate.load(Ordering::Relaxed),
            rejected = self.rejected.load(Ordering::Relaxed),
            fraud_rate = format!("{:.1}%", self.fraud_rate()),
            mean_us = processing.mean_us,
            p50_us = processing.p50_us,
            p99_us = processing.p99_us,
            max_us = processing.max_us,
            "Fraud check summary"
        );
    }
}

impl Default for CheckMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Check time statistics
#[derive(Debug, Default, PartialEq)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Logs a metrics summary on a fixed interval
pub struct MetricsReporter {
    metrics: Arc<CheckMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<CheckMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
