//! API error types and handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use collatio::CollatioError;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Conflict (e.g., a confirmation already in flight).
    Conflict(String),
    /// Internal server error.
    Internal(String),
    /// Error from the collatio library.
    Collatio(CollatioError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            ApiError::Collatio(e) => match e {
                CollatioError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
                CollatioError::Persistence(_) => (StatusCode::BAD_GATEWAY, "persistence"),
                CollatioError::DataFormat { .. } | CollatioError::CollationFailed { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "data_format")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.parts();
        let message = match self {
            ApiError::Conflict(msg) | ApiError::Internal(msg) => msg,
            ApiError::Collatio(e) => e.to_string(),
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<CollatioError> for ApiError {
    fn from(err: CollatioError) -> Self {
        ApiError::Collatio(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("background task failed: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Collatio(e) => write!(f, "Collatio error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
