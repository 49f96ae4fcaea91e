//! Error responses
//!
//! Maps the shared error taxonomy onto HTTP statuses with a
//! `{"error": "<message>"}` body.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lucky_common::api::ErrorResponse;
use lucky_common::Error;
use tracing::error;

/// Handler error
#[derive(Debug)]
pub enum ApiError {
    /// Failure from the repository, store or session manager
    Core(Error),
    /// Request body missing, not JSON, or the wrong shape
    InvalidBody(String),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::Core(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidBody(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Core(Error::Validation(msg)) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Core(Error::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Group not found".to_string())
            }
            ApiError::Core(Error::Unauthorized) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            ApiError::Core(e) => {
                error!("Request failed: {}", e);
                let message = if e.is_store_error() {
                    "Storage error".to_string()
                } else {
                    "Internal error".to_string()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
