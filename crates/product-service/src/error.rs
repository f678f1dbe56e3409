//! Unified error handling for the product catalog.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use minimart_core::wire::{MessageResponse, ValidationErrorResponse};

use crate::db::RepositoryError;

/// Application-level error type for the product service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request fields failed validation.
    #[error("Validation failed: {fields:?}")]
    Validation { fields: Vec<String> },

    /// A uniqueness rule was violated.
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_)) {
            tracing::error!(error = %self, "Request error");
        }

        match self {
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Internal server error")),
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
