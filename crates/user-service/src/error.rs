//! Unified error handling for the user directory.
//!
//! All route handlers return `Result<T, AppError>`. The error taxonomy maps
//! onto status codes and JSON bodies: authentication failures and missing
//! rows are values, never panics, and database details are logged rather
//! than leaked to clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use minimart_core::wire::{MessageResponse, ValidationErrorResponse};

use crate::db::RepositoryError;
use crate::password::PasswordError;

/// Application-level error type for the user service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Missing, invalid or revoked API key, or bad credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request fields failed validation.
    #[error("Validation failed: {fields:?}")]
    Validation { fields: Vec<String> },

    /// A uniqueness rule was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Hash => Self::Internal("password hashing failed".to_owned()),
            PasswordError::Mismatch => Self::Unauthorized("Not logged in"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server-side failures with detail; clients get a generic body.
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        match self {
            Self::Database(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Internal server error")),
            )
                .into_response(),
            Self::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                Json(MessageResponse::new(message)),
            )
                .into_response(),
            Self::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(MessageResponse::new(message))).into_response()
            }
            Self::Validation { fields } => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse {
                    message: "Invalid or missing fields".to_owned(),
                    fields,
                }),
            )
                .into_response(),
            Self::Conflict(message) => {
                (StatusCode::CONFLICT, Json(MessageResponse::new(message))).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
