//! Error handling for the web front

use crate::checker::CheckError;
use crate::web::render;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Check(#[from] CheckError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Check(e) if e.is_validation() => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            AppError::Check(e) => {
                tracing::error!(error = ?e, "Fraud check failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The fraud check could not be completed".to_string(),
                )
            }
            AppError::Task(e) => {
                tracing::error!(error = %e, "Fraud check task failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The fraud check could not be completed".to_string(),
                )
            }
        };

        (status, Html(render::error_page(status, &message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let validation = AppError::from(CheckError::MissingFields(vec!["merchant"]));
        assert_eq!(
            validation.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let scoring = AppError::from(CheckError::Scoring(anyhow::anyhow!("boom")));
        assert_eq!(
            scoring.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
