//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use minimart_core::{ProductId, Slug, wire::ProductSummary};

/// A catalog product (domain type).
///
/// Products are created through the admin endpoint and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unique human-readable key used in URLs.
    pub slug: Slug,
    /// Image reference (URL or asset path).
    pub image: String,
    /// Unit price.
    pub price: Decimal,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Wire-format snapshot of this product.
    #[must_use]
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            image: self.image.clone(),
            price: self.price,
        }
    }
}

/// Fields required to create a product.
#[derive(Debug)]
pub struct NewProduct {
    pub name: String,
    pub slug: Slug,
    pub image: String,
    pub price: Decimal,
}
