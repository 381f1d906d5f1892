//! Web front for the fraud check form

pub mod form;
pub mod handlers;
pub mod render;

use crate::checker::FraudChecker;
use crate::config::VoiceConfig;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<FraudChecker>,
    pub voice: VoiceConfig,
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/check", post(handlers::check))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
