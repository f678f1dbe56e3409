//! Client for the user directory.
//!
//! Every authenticated order request relays the bearer key to the user
//! service; the call is a single synchronous request with no retry. A
//! transport failure is a hard error for the caller, while an unknown key is
//! the ordinary "not logged in" outcome.

use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;

use minimart_core::{ApiKey, wire};

/// Errors from the user directory client.
#[derive(Debug, Error)]
pub enum UserClientError {
    /// HTTP request failed (connection refused, timeout, bad body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The user service answered with a status outside the contract.
    #[error("unexpected status from user service: {0}")]
    UnexpectedStatus(StatusCode),
}

/// Client for the user directory API.
///
/// Cheaply cloneable; the underlying `reqwest::Client` pools connections.
#[derive(Clone)]
pub struct UserDirectoryClient {
    inner: Arc<UserDirectoryClientInner>,
}

struct UserDirectoryClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl UserDirectoryClient {
    /// Create a new client for the user directory at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(UserDirectoryClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_owned(),
            }),
        }
    }

    /// Resolve a bearer API key to its owning user.
    ///
    /// Returns `Ok(None)` when the key is unknown or revoked (401 from the
    /// directory).
    ///
    /// # Errors
    ///
    /// Returns `UserClientError::Http` when the directory is unreachable and
    /// `UserClientError::UnexpectedStatus` for statuses outside the contract.
    pub async fn resolve(
        &self,
        key: &ApiKey,
    ) -> Result<Option<wire::UserSummary>, UserClientError> {
        let url = format!("{}/api/user", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, key.to_header())
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: wire::ResultResponse<wire::UserSummary> = response.json().await?;
                Ok(Some(body.result))
            }
            StatusCode::UNAUTHORIZED => Ok(None),
            status => Err(UserClientError::UnexpectedStatus(status)),
        }
    }
}
