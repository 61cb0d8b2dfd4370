//! Type-safe error codes for API responses.
//!
//! Each code has a SCREAMING_SNAKE_CASE identifier for clients and an integer
//! for logs.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::NotImplemented;
//! assert_eq!(code.as_str(), "NOT_IMPLEMENTED");
//! assert_eq!(code.code(), 1012);
//! ```

use serde::{Deserialize, Serialize};

/// Standardized error codes for API responses, all in the 1000-1999 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Path parameter could not be parsed
    InvalidPathParam,

    /// Request body is not valid JSON for the target type
    JsonExtraction,

    /// No route matches the request
    NotFound,

    /// The operation is documented but has no implementation
    NotImplemented,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPathParam => "INVALID_PATH_PARAM",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::NotImplemented => "NOT_IMPLEMENTED",
        }
    }

    /// Integer code used in structured logs.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidPathParam => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::NotImplemented => 1012,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
