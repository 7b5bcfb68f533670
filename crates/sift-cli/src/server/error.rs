//! API error types and handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sift::SiftError;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from client.
    BadRequest(String),
    /// Internal server error.
    Internal(String),
    /// Error from the sift library.
    Sift(SiftError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            ApiError::Sift(SiftError::SourceUnavailable { .. }) => {
                (StatusCode::BAD_GATEWAY, "source_unavailable")
            }
            ApiError::Sift(SiftError::Io { .. }) => (StatusCode::NOT_FOUND, "io_error"),
            ApiError::Sift(SiftError::UnknownColumn(_)) => (StatusCode::BAD_REQUEST, "unknown_column"),
            ApiError::Sift(_) => (StatusCode::UNPROCESSABLE_ENTITY, "parse_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.parts();
        let message = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
            ApiError::Sift(e) => e.to_string(),
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

impl From<SiftError> for ApiError {
    fn from(err: SiftError) -> Self {
        ApiError::Sift(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Sift(e) => write!(f, "Sift error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
