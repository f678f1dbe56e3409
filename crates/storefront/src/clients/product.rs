//! Client for the product catalog.

use std::sync::Arc;

use reqwest::StatusCode;

use minimart_core::wire;

use super::ClientError;

/// Client for the product catalog API.
#[derive(Clone)]
pub struct ProductClient {
    inner: Arc<ProductClientInner>,
}

struct ProductClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ProductClient {
    /// Create a new client for the catalog at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(ProductClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_owned(),
            }),
        }
    }

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the catalog is unreachable.
    pub async fn list(&self) -> Result<Vec<wire::ProductSummary>, ClientError> {
        let response = self
            .inner
            .client
            .get(format!("{}/api/products", self.inner.base_url))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus {
                service: "product",
                status: response.status(),
            });
        }

        let body: wire::ResultsResponse<wire::ProductSummary> = response.json().await?;
        Ok(body.results)
    }

    /// Fetch one product by slug; `None` when the slug is unknown.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the catalog is unreachable.
    pub async fn get(&self, slug: &str) -> Result<Option<wire::ProductSummary>, ClientError> {
        let response = self
            .inner
            .client
            .get(format!("{}/api/product/{slug}", self.inner.base_url))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: wire::ResultResponse<wire::ProductSummary> = response.json().await?;
                Ok(Some(body.result))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(ClientError::UnexpectedStatus {
                service: "product",
                status,
            }),
        }
    }
}
