pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error body returned by every failing endpoint.
///
/// ```json
/// {
///   "code": 1012,
///   "error": "NOT_IMPLEMENTED",
///   "message": "getProduct is not implemented"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that renders as an [`ErrorResponse`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Invalid path parameter: {0}")]
    InvalidPathParam(String),

    #[error("Not Implemented: {0}")]
    NotImplemented(String),
}

impl AppError {
    fn parts(self) -> (StatusCode, String, ErrorCode) {
        match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = ErrorCode::JsonExtraction.code(), "JSON extraction error: {:?}", e);
                (e.status(), e.body_text(), ErrorCode::JsonExtraction)
            }
            AppError::InvalidPathParam(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidPathParam.code(), "Invalid path parameter: {}", msg);
                (StatusCode::BAD_REQUEST, msg, ErrorCode::InvalidPathParam)
            }
            AppError::NotImplemented(msg) => {
                tracing::warn!(error_code = ErrorCode::NotImplemented.code(), "Not implemented: {}", msg);
                (StatusCode::NOT_IMPLEMENTED, msg, ErrorCode::NotImplemented)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code) = self.parts();
        error_response(status, message, code)
    }
}

/// Build an error response with no details.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}
