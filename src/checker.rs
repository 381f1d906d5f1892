//! Per-submission fraud check: validate, prepare features, score

use crate::feature_extractor::FeaturePreparer;
use crate::metrics::CheckMetrics;
use crate::models::encoder::LabelEncoders;
use crate::models::inference::Scorer;
use crate::types::transaction::TransactionInput;
use crate::types::verdict::CheckOutcome;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a submission could not be checked
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Please enter a number for: {}", .0.join(", "))]
    InvalidNumbers(Vec<&'static str>),

    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: String },

    #[error("Scoring failed: {0}")]
    Scoring(anyhow::Error),
}

impl CheckError {
    /// True for errors caused by the submitted values
    pub fn is_validation(&self) -> bool {
        !matches!(self, CheckError::Scoring(_))
    }
}

/// Runs checks against a scorer and encoders loaded once at startup
pub struct FraudChecker {
    preparer: FeaturePreparer,
    scorer: Arc<dyn Scorer>,
    metrics: Arc<CheckMetrics>,
}

impl FraudChecker {
    pub fn new(
        encoders: Arc<LabelEncoders>,
        scorer: Arc<dyn Scorer>,
        metrics: Arc<CheckMetrics>,
    ) -> Self {
        Self {
            preparer: FeaturePreparer::new(encoders),
            scorer,
            metrics,
        }
    }

    /// Check one transaction.
    ///
    /// Missing text fields are rejected before any features are computed, so
    /// the scorer is never called for them.
    pub fn check(&self, tx: &TransactionInput) -> Result<CheckOutcome, CheckError> {
        if let Err(e) = validate(tx) {
            self.metrics.record_rejection();
            warn!(error = %e, "Rejected submission");
            return Err(e);
        }

        let start_time = Instant::now();
        let features = self.preparer.prepare(tx);
        debug!(features = ?features, "Prepared features");

        let verdict = self
            .scorer
            .score(&features)
            .map_err(CheckError::Scoring)?;
        let elapsed = start_time.elapsed();
        self.metrics.record_check(elapsed, verdict);

        info!(
            model = %self.scorer.name(),
            verdict = ?verdict,
            distance_km = features.distance_km,
            merchant_code = features.merchant_code,
            category_code = features.category_code,
            processing_time_us = elapsed.as_micros() as u64,
            "Transaction checked"
        );

        Ok(CheckOutcome::new(verdict, features))
    }

    pub fn metrics(&self) -> &CheckMetrics {
        &self.metrics
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }
}

/// Enforce required text fields and the ranges the form widgets allow.
///
/// Coordinates are accepted as given.
pub fn validate(tx: &TransactionInput) -> Result<(), CheckError> {
    let missing = tx.missing_fields();
    if !missing.is_empty() {
        return Err(CheckError::MissingFields(missing));
    }

    if !tx.amount.is_finite() || tx.amount < 0.0 {
        return Err(CheckError::OutOfRange {
            field: "amount",
            value: tx.amount.to_string(),
        });
    }

    let bounded = [
        ("hour", tx.hour, 0..=23),
        ("day", tx.day, 1..=31),
        ("month", tx.month, 1..=12),
    ];
    for (field, value, range) in bounded {
        if !range.contains(&value) {
            return Err(CheckError::OutOfRange {
                field,
                value: value.to_string(),
            });
        }
    }

    Ok(())
}
