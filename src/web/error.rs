// Error types for the API server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::rates::RateFetchError;

/// API server error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    UnsupportedMediaType(String),
    InternalServerError(String),
    BadGateway(String),

    // Application-specific errors
    // Decode failures are propagated as server errors, matching the
    // behavior of an unhandled codec exception.
    ImageProcessingError(String),
    ArchiveError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg),
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),

            Self::ImageProcessingError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Self::ArchiveError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": {
                "status": status.as_u16(),
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

// Both rate providers failing is an upstream problem, not ours
impl From<RateFetchError> for ApiError {
    fn from(error: RateFetchError) -> Self {
        Self::BadGateway(error.to_string())
    }
}
