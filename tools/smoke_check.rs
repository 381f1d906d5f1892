//! Smoke Check
//!
//! Loads the configured model artifacts and scores a sample Manhattan coffee
//! purchase, to confirm the artifacts work together before serving traffic.

use anyhow::Result;
use card_fraud_check::{
    config::AppConfig,
    metrics::CheckMetrics,
    models::{loader, OnnxScorer, Scorer},
    types::{Coordinates, Gender, TransactionInput},
    FraudChecker,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("card_fraud_check=info".parse()?)
                .add_directive("smoke_check=info".parse()?),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load_from_path(&path)?,
        None => AppConfig::load()?,
    };

    let encoders = Arc::new(loader::load_encoders(&config.models.encoders_path)?);
    let scorer: Arc<dyn Scorer> = Arc::new(OnnxScorer::load(
        &config.models.model_path,
        config.models.onnx_threads,
    )?);
    let checker = FraudChecker::new(encoders, scorer, Arc::new(CheckMetrics::new()));

    let tx = TransactionInput {
        merchant: "CoffeeShop".to_string(),
        category: "grocery".to_string(),
        amount: 100.0,
        customer_location: Coordinates::new(40.7128, -74.0060),
        merchant_location: Coordinates::new(40.7589, -73.9851),
        hour: 12,
        day: 15,
        month: 6,
        gender: Gender::Male,
        card_identifier: "4111111111111111".to_string(),
    };

    let outcome = checker.check(&tx)?;

    info!(
        verdict = ?outcome.verdict,
        label = outcome.verdict.as_label(),
        distance_km = format!("{:.2}", outcome.distance_km),
        features = ?outcome.features.to_model_input(),
        checked_at = %outcome.checked_at,
        "Smoke check complete"
    );

    Ok(())
}
