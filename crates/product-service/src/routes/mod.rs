//! HTTP route handlers for the product catalog.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness check
//! GET  /health/ready        - Readiness check (pings the database)
//!
//! GET  /api/products        - All products
//! GET  /api/product/{slug}  - Product by slug
//! POST /api/product/create  - Create a product (admin)
//! ```

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use minimart_core::{Slug, wire};

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::NewProduct;
use crate::state::AppState;

/// Create all API routes for the product service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list))
        .route("/api/product/{slug}", get(show))
        .route("/api/product/create", post(create))
}

/// Product creation form data.
#[derive(Debug, Deserialize)]
pub struct CreateProductForm {
    pub name: String,
    pub slug: String,
    pub image: String,
    pub price: String,
}

/// All products under a `results` key.
#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
) -> Result<Json<wire::ResultsResponse<wire::ProductSummary>>> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(Json(wire::ResultsResponse {
        results: products.iter().map(crate::models::Product::summary).collect(),
    }))
}

/// Product by slug.
#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<wire::ResultResponse<wire::ProductSummary>>> {
    let slug =
        Slug::parse(&slug).map_err(|_| AppError::NotFound("Product not found".to_owned()))?;

    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(wire::ResultResponse {
        result: product.summary(),
    }))
}

/// Create a product.
#[instrument(skip(state, form), fields(slug = %form.slug))]
async fn create(
    State(state): State<AppState>,
    Form(form): Form<CreateProductForm>,
) -> Result<Json<wire::ProductCreatedResponse>> {
    let mut invalid = Vec::new();

    if form.name.is_empty() {
        invalid.push("name".to_owned());
    }
    if form.image.is_empty() {
        invalid.push("image".to_owned());
    }
    let slug = match Slug::parse(&form.slug) {
        Ok(slug) => Some(slug),
        Err(_) => {
            invalid.push("slug".to_owned());
            None
        }
    };
    let price = match form.price.parse::<Decimal>() {
        Ok(price) if price >= Decimal::ZERO => Some(price),
        _ => {
            invalid.push("price".to_owned());
            None
        }
    };

    let (Some(slug), Some(price)) = (slug, price) else {
        return Err(AppError::Validation { fields: invalid });
    };
    if !invalid.is_empty() {
        return Err(AppError::Validation { fields: invalid });
    }

    let new = NewProduct {
        name: form.name,
        slug,
        image: form.image,
        price,
    };

    let product = ProductRepository::new(state.pool())
        .create(&new)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Database(other),
        })?;

    tracing::info!(product_id = %product.id, "product created");

    Ok(Json(wire::ProductCreatedResponse {
        message: "Product added successfully".to_owned(),
        product: product.summary(),
    }))
}
