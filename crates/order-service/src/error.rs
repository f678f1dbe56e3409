//! Unified error handling for the order ledger.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use minimart_core::wire::{MessageResponse, ValidationErrorResponse};

use crate::clients::UserClientError;
use crate::db::RepositoryError;

/// Application-level error type for the order service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Missing, unknown or revoked bearer key.
    #[error("Unauthorized")]
    Unauthorized,

    /// Checkout was requested but the user has no open order.
    #[error("No open order")]
    NoOpenOrder,

    /// Request fields failed validation.
    #[error("Validation failed: {fields:?}")]
    Validation { fields: Vec<String> },

    /// Two requests raced to create the user's open order.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The user directory could not be reached or misbehaved.
    #[error("User service error: {0}")]
    UserService(#[from] UserClientError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_) | Self::UserService(_)) {
            tracing::error!(error = %self, "Request error");
        }

        match self {
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Internal server error")),
            )
                .into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(MessageResponse::new("Not logged in")),
            )
                .into_response(),
            Self::NoOpenOrder => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new("No open order to checkout")),
            )
                .into_response(),
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
            Self::UserService(_) => (
                StatusCode::BAD_GATEWAY,
                Json(MessageResponse::new("User service unavailable")),
            )
                .into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let status = |err: AppError| err.into_response().status();

        assert_eq!(status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AppError::NoOpenOrder), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(AppError::Validation {
                fields: vec!["qty".to_owned()]
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(AppError::Conflict("race".to_owned())),
            StatusCode::CONFLICT
        );
    }
}
