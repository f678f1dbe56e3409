//! JSON wire format shared by the services, the storefront clients and tests.
//!
//! Every endpoint responds with one of a small set of envelopes. The shapes
//! (`message`, `result`, `results`, `api_key`) are part of the public contract
//! and are kept stable here instead of being rebuilt ad hoc per handler.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ApiKey, OrderId, ProductId, Slug, UserId, Username};

// =============================================================================
// Envelopes
// =============================================================================

/// Ack or error body: `{"message": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Single-object read: `{"result": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultResponse<T> {
    pub result: T,
}

/// Collection read: `{"results": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse<T> {
    pub results: Vec<T>,
}

/// Creation ack with the created entity: `{"message": ..., "result": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse<T> {
    pub message: String,
    pub result: T,
}

/// Successful login: `{"message": ..., "api_key": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub api_key: ApiKey,
}

/// Product creation ack. The created entity rides under a `product` key
/// rather than `result` - a quirk of the catalog contract, preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreatedResponse {
    pub message: String,
    pub product: ProductSummary,
}

/// Validation failure body: `{"message": ..., "fields": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub message: String,
    pub fields: Vec<String>,
}

// =============================================================================
// Snapshots
// =============================================================================

/// Serialized user as exposed by the user directory.
///
/// Never carries the password hash or the API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: Username,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Serialized product as exposed by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub slug: Slug,
    pub image: String,
    pub price: Decimal,
}

/// A line item inside an order snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemSnapshot {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Serialized order as exposed by the order ledger.
///
/// Cross-service consumers (the storefront session cache in particular) hold
/// these snapshots and tolerate them going stale until the next refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub id: OrderId,
    pub user_id: UserId,
    pub is_open: bool,
    pub items: Vec<OrderItemSnapshot>,
}

impl OrderSnapshot {
    /// True when the order has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total quantity across all line items.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_shape() {
        let body = MessageResponse::new("Not logged in");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Not logged in"}));
    }

    #[test]
    fn test_login_shape() {
        let body = LoginResponse {
            message: "Logged in".to_owned(),
            api_key: ApiKey::from_value("k"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"message": "Logged in", "api_key": "k"})
        );
    }

    #[test]
    fn test_product_created_uses_product_key() {
        let body = ProductCreatedResponse {
            message: "Product added successfully".to_owned(),
            product: ProductSummary {
                id: ProductId::new(1),
                name: "Widget".to_owned(),
                slug: Slug::parse("widget").unwrap(),
                image: "widget.png".to_owned(),
                price: Decimal::new(1999, 2),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("product").is_some());
        assert!(json.get("result").is_none());
        assert_eq!(json["product"]["price"], "19.99");
    }

    #[test]
    fn test_order_snapshot_helpers() {
        let order = OrderSnapshot {
            id: OrderId::new(1),
            user_id: UserId::new(2),
            is_open: true,
            items: vec![
                OrderItemSnapshot {
                    product_id: ProductId::new(1),
                    quantity: 2,
                },
                OrderItemSnapshot {
                    product_id: ProductId::new(2),
                    quantity: 3,
                },
            ],
        };
        assert!(!order.is_empty());
        assert_eq!(order.total_quantity(), 5);
    }

    #[test]
    fn test_order_snapshot_roundtrip() {
        let json = serde_json::json!({
            "id": 1,
            "user_id": 2,
            "is_open": true,
            "items": [{"product_id": 3, "quantity": 4}],
        });
        let order: OrderSnapshot = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&order).unwrap(), json);
    }
}
