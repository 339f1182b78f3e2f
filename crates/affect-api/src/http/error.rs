//! Application error type mapping to HTTP status codes.
//!
//! Error bodies keep the flat shape existing quiz clients read:
//! `{"error": "...", "code": "...", "details": "..."}`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use affect_types::error::AnalyzerError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Analyzer errors (empty answer or chain exhaustion).
    Analyzer(AnalyzerError),
    /// Malformed or invalid request.
    Validation(String),
}

impl From<AnalyzerError> for AppError {
    fn from(e: AnalyzerError) -> Self {
        AppError::Analyzer(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Analyzer(AnalyzerError::EmptyAnswer) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "answerText is required", "code": "VALIDATION_ERROR" }),
            ),
            AppError::Analyzer(e @ AnalyzerError::AllProvidersFailed { .. }) => {
                tracing::error!(error = %e, "Request failed: no provider produced a score");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Analysis failed",
                        "details": e.to_string(),
                        "code": "ALL_PROVIDERS_FAILED",
                    }),
                )
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": msg, "code": "VALIDATION_ERROR" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
