//! Card Fraud Check Library
//!
//! Prepares model features from a submitted card transaction and classifies it
//! with a pre-trained fraud model, behind a single-page web form.

pub mod checker;
pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod geo;
pub mod metrics;
pub mod models;
pub mod types;
pub mod web;

pub use checker::{CheckError, FraudChecker};
pub use config::AppConfig;
pub use feature_extractor::{FeaturePreparer, FeatureVector};
pub use models::inference::{OnnxScorer, Scorer};
pub use types::{CheckOutcome, TransactionInput, Verdict};
