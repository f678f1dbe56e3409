//! Client for the user directory.

use std::sync::Arc;

use reqwest::StatusCode;

use minimart_core::{ApiKey, wire};

use super::ClientError;

/// Registration fields forwarded to the user directory.
#[derive(Debug)]
pub struct Registration<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub username: &'a str,
}

/// Client for the user directory API.
#[derive(Clone)]
pub struct UserClient {
    inner: Arc<UserClientInner>,
}

struct UserClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl UserClient {
    /// Create a new client for the user directory at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(UserClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_owned(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Check whether a username is already taken.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the directory is unreachable.
    pub async fn exists(&self, username: &str) -> Result<bool, ClientError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/api/user/{username}/exists")))
            .send()
            .await?;

        Ok(response.status() == StatusCode::OK)
    }

    /// Register a new user.
    ///
    /// Returns the created user, or `None` when the directory rejected the
    /// registration (duplicate username, validation failure).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the directory is unreachable.
    pub async fn register(
        &self,
        registration: &Registration<'_>,
    ) -> Result<Option<wire::UserSummary>, ClientError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/user/create"))
            .form(&[
                ("email", registration.email),
                ("password", registration.password),
                ("first_name", registration.first_name),
                ("last_name", registration.last_name),
                ("username", registration.username),
            ])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Ok(None);
        }

        let body: wire::CreatedResponse<wire::UserSummary> = response.json().await?;
        Ok(Some(body.result))
    }

    /// Login; returns the freshly minted API key, or `None` on bad
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the directory is unreachable.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<ApiKey>, ClientError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/user/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: wire::LoginResponse = response.json().await?;
                Ok(Some(body.api_key))
            }
            StatusCode::UNAUTHORIZED => Ok(None),
            status => Err(ClientError::UnexpectedStatus {
                service: "user",
                status,
            }),
        }
    }

    /// Fetch the user owning a bearer key; `None` when the key is invalid.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the directory is unreachable.
    pub async fn current(&self, key: &ApiKey) -> Result<Option<wire::UserSummary>, ClientError> {
        let response = self
            .inner
            .client
            .get(self.url("/api/user"))
            .header(reqwest::header::AUTHORIZATION, key.to_header())
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: wire::ResultResponse<wire::UserSummary> = response.json().await?;
                Ok(Some(body.result))
            }
            StatusCode::UNAUTHORIZED => Ok(None),
            status => Err(ClientError::UnexpectedStatus {
                service: "user",
                status,
            }),
        }
    }

    /// Revoke the bearer key (logout). The 401 for an already-dead key is
    /// treated as success.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the directory is unreachable.
    pub async fn logout(&self, key: &ApiKey) -> Result<(), ClientError> {
        self.inner
            .client
            .post(self.url("/api/user/logout"))
            .header(reqwest::header::AUTHORIZATION, key.to_header())
            .send()
            .await?;

        Ok(())
    }
}
