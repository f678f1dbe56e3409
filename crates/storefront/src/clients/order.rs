//! Client for the order ledger.

use std::sync::Arc;

use reqwest::StatusCode;

use minimart_core::{ApiKey, ProductId, wire};

use super::ClientError;

/// Client for the order ledger API.
#[derive(Clone)]
pub struct OrderClient {
    inner: Arc<OrderClientInner>,
}

struct OrderClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl OrderClient {
    /// Create a new client for the ledger at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(OrderClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_owned(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Fetch the current open order; `None` when there is none (the ledger
    /// answers 200 with a message body) or the key no longer resolves.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the ledger is unreachable.
    pub async fn get(&self, key: &ApiKey) -> Result<Option<wire::OrderSnapshot>, ClientError> {
        let response = self
            .inner
            .client
            .get(self.url("/api/order"))
            .header(reqwest::header::AUTHORIZATION, key.to_header())
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                // Either {"result": order} or {"message": "No open order found"}
                let body: serde_json::Value = response.json().await?;
                match body.get("result") {
                    Some(result) => {
                        let order = serde_json::from_value(result.clone())
                            .map_err(|_| ClientError::UnexpectedStatus {
                                service: "order",
                                status: StatusCode::OK,
                            })?;
                        Ok(Some(order))
                    }
                    None => Ok(None),
                }
            }
            StatusCode::UNAUTHORIZED => Ok(None),
            status => Err(ClientError::UnexpectedStatus {
                service: "order",
                status,
            }),
        }
    }

    /// Add a product to the cart; returns the updated order.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the ledger is unreachable and
    /// `ClientError::UnexpectedStatus` when the add is rejected.
    pub async fn add_item(
        &self,
        key: &ApiKey,
        product_id: ProductId,
        qty: i64,
    ) -> Result<wire::OrderSnapshot, ClientError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/order/add-item"))
            .header(reqwest::header::AUTHORIZATION, key.to_header())
            .form(&[
                ("product_id", product_id.to_string()),
                ("qty", qty.to_string()),
            ])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus {
                service: "order",
                status: response.status(),
            });
        }

        let body: wire::ResultResponse<wire::OrderSnapshot> = response.json().await?;
        Ok(body.result)
    }

    /// Check out the current open order; returns the closed order, or `None`
    /// when there was nothing to check out.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the ledger is unreachable.
    pub async fn checkout(&self, key: &ApiKey) -> Result<Option<wire::OrderSnapshot>, ClientError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/order/checkout"))
            .header(reqwest::header::AUTHORIZATION, key.to_header())
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: wire::ResultResponse<wire::OrderSnapshot> = response.json().await?;
                Ok(Some(body.result))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Ok(None),
            status => Err(ClientError::UnexpectedStatus {
                service: "order",
                status,
            }),
        }
    }
}
