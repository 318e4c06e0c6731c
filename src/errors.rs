use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("model fit failed: {0}")]
    FitFailure(String),
    #[error("degenerate input: {0}")]
    DegenerateInput(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{what} not found") })),
            )
                .into_response(),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "authentication required" })),
            )
                .into_response(),
            // Fit and degenerate-input failures keep their diagnostics in the
            // log; callers only see a generic payload.
            AppError::FitFailure(detail) => {
                tracing::error!("model fit failed: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "analytics computation failed" })),
                )
                    .into_response()
            }
            AppError::DegenerateInput(detail) => {
                tracing::error!("degenerate analytics input: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "analytics computation failed" })),
                )
                    .into_response()
            }
        }
    }
}
