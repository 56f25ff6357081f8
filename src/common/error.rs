// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::ValidationResult;

/// API error types
///
/// Every failed operation surfaces one of these discriminated kinds;
/// nothing is swallowed or collapsed into a generic failure.
#[derive(Debug)]
pub enum ApiError {
    /// No resolvable caller identity (missing/invalid token, unknown user).
    Unauthenticated(String),
    /// Authenticated but insufficient role or ownership.
    Unauthorized(String),
    NotFound(String),
    /// Operation not valid for the entity's current lifecycle state.
    InvalidState(String),
    /// Lost a race on a state transition; the caller may retry after re-reading.
    Conflict(String),
    ValidationError(String),
    /// Blob store unreachable or erroring.
    StorageFailure(String),
    /// Document store (SQLite) failure.
    DatabaseError(sqlx::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InvalidState(msg) => write!(f, "Invalid State: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::StorageFailure(msg) => write!(f, "Storage Failure: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHENTICATED"),
            ApiError::Unauthorized(msg) => (StatusCode::FORBIDDEN, msg, "UNAUTHORIZED"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::InvalidState(msg) => (StatusCode::CONFLICT, msg, "INVALID_STATE"),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT"),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, "VALIDATION_ERROR"),
            ApiError::StorageFailure(msg) => {
                error!(error = %msg, "Blob store operation failed");
                (StatusCode::SERVICE_UNAVAILABLE, msg, "STORAGE_FAILURE")
            }
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                )
            }
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        let error_messages: Vec<String> = result
            .errors()
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        ApiError::ValidationError(error_messages.join(", "))
    }
}
