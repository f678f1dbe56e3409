//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use minimart_core::ApiKey;

use crate::error::AppError;

/// Extractor for the bearer API key.
///
/// Reads the `Authorization` header, stripping the legacy `Basic ` prefix.
/// Rejects with 401 when the header is missing or empty; resolving the key
/// to a user is left to the handler.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Bearer(key): Bearer) -> impl IntoResponse {
///     // look up the user owning `key`
/// }
/// ```
pub struct Bearer(pub ApiKey);

impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(ApiKey::from_header)
            .ok_or(AppError::Unauthorized("Not logged in"))?;

        Ok(Self(key))
    }
}
