//! Seed the product catalog with demo data.
//!
//! Inserts a small fixed set of products. Seeding is idempotent: slugs that
//! already exist are skipped, so the command can run on every deploy.

use rust_decimal::Decimal;
use thiserror::Error;

use minimart_core::Slug;
use minimart_product_service::db::products::ProductRepository;
use minimart_product_service::db::{self, RepositoryError};
use minimart_product_service::models::NewProduct;

/// Errors from seeding commands.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),
}

/// (name, slug, image, price)
const DEMO_PRODUCTS: &[(&str, &str, &str, &str)] = &[
    ("Widget", "widget", "/images/widget.png", "19.99"),
    ("Deluxe Widget", "deluxe-widget", "/images/deluxe-widget.png", "34.50"),
    ("Gadget", "gadget", "/images/gadget.png", "9.99"),
    ("Sprocket", "sprocket", "/images/sprocket.png", "4.25"),
    ("Gizmo", "gizmo", "/images/gizmo.png", "12.00"),
];

/// Insert the demo products, skipping slugs that already exist.
///
/// # Errors
///
/// Returns `SeedError` if the connection fails, a seed entry is malformed,
/// or an insert fails.
pub async fn products() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();
    let url = std::env::var("PRODUCT_SERVICE_DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:minimart-products.db".to_owned());

    let pool = db::create_pool(&url).await?;
    let repo = ProductRepository::new(&pool);

    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for (name, slug, image, price) in DEMO_PRODUCTS {
        let slug = Slug::parse(slug)
            .map_err(|e| SeedError::InvalidSeed(format!("slug {slug}: {e}")))?;
        let price = price
            .parse::<Decimal>()
            .map_err(|e| SeedError::InvalidSeed(format!("price for {name}: {e}")))?;

        if repo.get_by_slug(&slug).await?.is_some() {
            skipped += 1;
            continue;
        }

        repo.create(&NewProduct {
            name: (*name).to_owned(),
            slug,
            image: (*image).to_owned(),
            price,
        })
        .await?;
        inserted += 1;
    }

    tracing::info!(inserted, skipped, "Seeding complete");
    Ok(())
}
