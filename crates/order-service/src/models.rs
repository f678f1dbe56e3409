//! Order domain types.

use chrono::{DateTime, Utc};

use minimart_core::{
    OrderId, OrderItemId, ProductId, UserId,
    wire::{OrderItemSnapshot, OrderSnapshot},
};

/// An order and its line items (domain type).
///
/// An order is "open" while it accepts new line items; checkout closes it
/// and a later first-add starts a fresh one. Closed orders are never
/// reopened or deleted.
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning user (an ID from the user directory; not a local foreign key).
    pub user_id: UserId,
    /// Whether the order still accepts items.
    pub is_open: bool,
    /// Line items, oldest first.
    pub items: Vec<OrderItem>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A line item: one product with an accumulated quantity.
#[derive(Debug, Clone)]
pub struct OrderItem {
    /// Unique line item ID.
    pub id: OrderItemId,
    /// Order this item belongs to.
    pub order_id: OrderId,
    /// Referenced product (an ID from the catalog; not a local foreign key).
    pub product_id: ProductId,
    /// Accumulated quantity.
    pub quantity: i64,
    /// When the item was first added.
    pub created_at: DateTime<Utc>,
    /// When the quantity was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Wire-format snapshot of this order.
    #[must_use]
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            id: self.id,
            user_id: self.user_id,
            is_open: self.is_open,
            items: self
                .items
                .iter()
                .map(|item| OrderItemSnapshot {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}
