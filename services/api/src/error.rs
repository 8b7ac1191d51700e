//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
///
/// Every variant renders as `{ "message": ... }`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed input
    #[error("{0}")]
    BadRequest(String),

    /// Referenced entity absent, or a listing came back empty
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation
    #[error("{0}")]
    Conflict(String),

    /// The user is not allowed to own new records
    #[error("{0}")]
    Forbidden(String),

    /// Unauthorized access
    #[error("Unauthorized")]
    Unauthorized,

    /// Internal server error
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    pub fn all_fields_required() -> Self {
        ApiError::BadRequest("All fields are required".to_string())
    }

    /// HTTP status the error renders with
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InternalServerError(_) | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Forbidden(msg) => msg,
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::InternalServerError(detail) => {
                error!("Internal server error: {}", detail);
                "Internal server error".to_string()
            }
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                "Database error".to_string()
            }
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
