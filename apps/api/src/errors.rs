use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::planner::generator::GenerationFailure;
use crate::planner::swap::SwapError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationFailure),

    /// Catch-all for failures outside the generation pipeline; details stay in the logs.
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SwapError> for AppError {
    fn from(err: SwapError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Generation(failure) => {
                // Only the user-facing message leaves the service.
                tracing::debug!("Generation failure cause: {}", failure.cause());
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_FAILED",
                    failure.message().to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
