//! Card Fraud Check - Main Entry Point
//!
//! Loads the fraud model and label encoders once, then serves the fraud check
//! form over HTTP.

use anyhow::{Context, Result};
use card_fraud_check::{
    config::{AppConfig, LoggingConfig},
    metrics::{CheckMetrics, MetricsReporter},
    models::{loader, OnnxScorer, Scorer},
    web::{create_router, AppState},
    FraudChecker,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load_from_path(&path)?,
        None => AppConfig::load()?,
    };

    init_logging(&config.logging)?;
    info!("Starting Card Fraud Check");

    // Artifacts are loaded once; failure here stops the process
    let encoders = loader::load_encoders(&config.models.encoders_path)
        .context("Label encoders could not be loaded")?;
    let scorer = OnnxScorer::load(&config.models.model_path, config.models.onnx_threads)
        .context("Fraud model could not be loaded")?;
    info!(model = %scorer.name(), "Fraud model ready");

    let metrics = Arc::new(CheckMetrics::new());
    let scorer: Arc<dyn Scorer> = Arc::new(scorer);
    let checker = Arc::new(FraudChecker::new(
        Arc::new(encoders),
        scorer,
        metrics.clone(),
    ));

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let app = create_router(AppState {
        checker,
        voice: config.voice.clone(),
    });

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down...");
    metrics.print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!(
            "card_fraud_check={level},tower_http={level}",
            level = logging.level
        ))
    })?;

    if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
