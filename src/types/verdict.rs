//! Fraud check verdict and outcome structures

use crate::feature_extractor::FeatureVector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary classification returned by the scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Legitimate,
    Fraudulent,
}

impl Verdict {
    /// Map a raw model label to a verdict.
    ///
    /// Only label 1 marks fraud; every other label reads as legitimate.
    pub fn from_label(label: i64) -> Self {
        if label == 1 {
            Verdict::Fraudulent
        } else {
            Verdict::Legitimate
        }
    }

    /// Map a fraud-class probability to a verdict.
    ///
    /// Fraud must be strictly more likely than not; a 0.5 tie is legitimate.
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.5 {
            Verdict::Fraudulent
        } else {
            Verdict::Legitimate
        }
    }

    pub fn is_fraud(&self) -> bool {
        matches!(self, Verdict::Fraudulent)
    }

    pub fn as_label(&self) -> i64 {
        match self {
            Verdict::Legitimate => 0,
            Verdict::Fraudulent => 1,
        }
    }

    /// Banner headline shown on the result page
    pub fn headline(&self) -> &'static str {
        match self {
            Verdict::Fraudulent => "🚨 FRAUDULENT TRANSACTION DETECTED",
            Verdict::Legitimate => "✅ LEGITIMATE TRANSACTION",
        }
    }

    /// Banner body shown on the result page
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Fraudulent => {
                "This transaction has been flagged as potentially fraudulent. \
                 Please review the transaction details and contact customer support if necessary."
            }
            Verdict::Legitimate => {
                "This transaction appears to be legitimate and can proceed normally."
            }
        }
    }
}

/// Result of checking one submitted transaction
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub verdict: Verdict,

    /// Distance between customer and merchant in kilometres
    pub distance_km: f64,

    /// Submitted amount
    pub amount: f64,

    /// Submitted hour of day
    pub hour: u32,

    /// Feature vector that was scored
    pub features: FeatureVector,

    /// When the check completed
    pub checked_at: DateTime<Utc>,
}

impl CheckOutcome {
    pub fn new(verdict: Verdict, features: FeatureVector) -> Self {
        Self {
            verdict,
            distance_km: features.distance_km,
            amount: features.amount,
            hour: features.hour,
            features,
            checked_at: Utc::now(),
        }
    }
}
