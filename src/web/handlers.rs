//! HTTP handlers

use crate::checker::CheckError;
use crate::error::AppResult;
use crate::web::form::CheckForm;
use crate::web::render::{self, Notice, PageView, MISSING_FIELDS_MESSAGE};
use crate::web::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;
use tracing::warn;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model: String,
    timestamp: i64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model: state.checker.scorer_name().to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Blank form with the configured voice default
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let form = CheckForm::with_voice(state.voice.enabled);

    Html(render::page(&PageView {
        form: &form,
        distance_km: form.distance_km(),
        voice: &state.voice,
        notice: Notice::Welcome,
    }))
}

/// Check a submitted transaction and render the verdict
pub async fn check(
    State(state): State<AppState>,
    Form(form): Form<CheckForm>,
) -> AppResult<Response> {
    let tx = match form.to_transaction() {
        Ok(tx) => tx,
        Err(e) => {
            state.checker.metrics().record_rejection();
            warn!(error = %e, "Rejected form submission");
            return Ok(rejected(&state, &form, &e));
        }
    };

    let checker = state.checker.clone();
    let outcome = match tokio::task::spawn_blocking(move || checker.check(&tx)).await? {
        Ok(outcome) => outcome,
        Err(e) if e.is_validation() => return Ok(rejected(&state, &form, &e)),
        Err(e) => return Err(e.into()),
    };

    let html = render::page(&PageView {
        form: &form,
        distance_km: Some(outcome.distance_km),
        voice: &state.voice,
        notice: Notice::Outcome(&outcome),
    });

    Ok(Html(html).into_response())
}

/// Re-render the submitted form with the validation message
fn rejected(state: &AppState, form: &CheckForm, error: &CheckError) -> Response {
    let missing_fields = matches!(error, CheckError::MissingFields(_));
    let message = if missing_fields {
        MISSING_FIELDS_MESSAGE.to_string()
    } else {
        format!("⚠️ {}", error)
    };

    let html = render::page(&PageView {
        form,
        distance_km: form.distance_km(),
        voice: &state.voice,
        notice: Notice::Invalid {
            message: &message,
            missing_fields,
        },
    });

    (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response()
}
