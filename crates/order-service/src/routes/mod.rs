//! HTTP route handlers for the order ledger.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness check
//! GET  /health/ready        - Readiness check (pings the database)
//!
//! GET  /api/order           - Current open order (bearer)
//! POST /api/order/add-item  - Add a product to the open order (bearer)
//! POST /api/order/checkout  - Close the open order (bearer)
//! GET  /api/orders          - All orders (admin listing)
//! ```
//!
//! Every bearer route resolves the key against the user directory before
//! touching the ledger.

use axum::{
    Form, Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use minimart_core::{ApiKey, ProductId, wire};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::extract::Bearer;
use crate::state::AppState;

/// Create all API routes for the order service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/order", get(show))
        .route("/api/order/add-item", post(add_item))
        .route("/api/order/checkout", post(checkout))
        .route("/api/orders", get(list))
}

/// Add-to-cart form data.
///
/// Fields arrive as strings and are coerced here so a malformed value is a
/// typed validation error, not a deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct AddItemForm {
    pub product_id: String,
    pub qty: Option<String>,
}

/// Resolve the bearer key to a user via the directory.
async fn authenticate(state: &AppState, key: &ApiKey) -> Result<wire::UserSummary> {
    state
        .users()
        .resolve(key)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Current open order for the authenticated user.
///
/// A user with no open order gets a 200 with a message body rather than a
/// 404; clients probe for the `result` key.
#[instrument(skip(state, key))]
async fn show(State(state): State<AppState>, Bearer(key): Bearer) -> Result<Response> {
    let user = authenticate(&state, &key).await?;

    let order = OrderRepository::new(state.pool()).get_open(user.id).await?;

    match order {
        Some(order) => Ok(Json(wire::ResultResponse {
            result: order.snapshot(),
        })
        .into_response()),
        None => Ok(Json(wire::MessageResponse::new("No open order found")).into_response()),
    }
}

/// Add a product to the authenticated user's open order.
#[instrument(skip(state, key, form))]
async fn add_item(
    State(state): State<AppState>,
    Bearer(key): Bearer,
    Form(form): Form<AddItemForm>,
) -> Result<Json<wire::ResultResponse<wire::OrderSnapshot>>> {
    let user = authenticate(&state, &key).await?;

    let mut invalid = Vec::new();
    let product_id = match form.product_id.parse::<i64>() {
        Ok(id) if id > 0 => Some(ProductId::new(id)),
        _ => {
            invalid.push("product_id".to_owned());
            None
        }
    };
    let quantity = match form.qty.as_deref() {
        // Quantity defaults to 1 when omitted
        None => Some(1),
        Some(raw) => match raw.parse::<i64>() {
            Ok(qty) if qty >= 1 => Some(qty),
            _ => {
                invalid.push("qty".to_owned());
                None
            }
        },
    };

    let (Some(product_id), Some(quantity)) = (product_id, quantity) else {
        return Err(AppError::Validation { fields: invalid });
    };

    let order = OrderRepository::new(state.pool())
        .add_item(user.id, product_id, quantity)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Database(other),
        })?;

    tracing::info!(user_id = %user.id, order_id = %order.id, %product_id, quantity, "item added to order");

    Ok(Json(wire::ResultResponse {
        result: order.snapshot(),
    }))
}

/// Close the authenticated user's open order.
#[instrument(skip(state, key))]
async fn checkout(
    State(state): State<AppState>,
    Bearer(key): Bearer,
) -> Result<Json<wire::ResultResponse<wire::OrderSnapshot>>> {
    let user = authenticate(&state, &key).await?;

    let order = OrderRepository::new(state.pool())
        .close_open(user.id)
        .await?
        .ok_or(AppError::NoOpenOrder)?;

    tracing::info!(user_id = %user.id, order_id = %order.id, "order checked out");

    Ok(Json(wire::ResultResponse {
        result: order.snapshot(),
    }))
}

/// All orders as a plain array.
#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<wire::OrderSnapshot>>> {
    let orders = OrderRepository::new(state.pool()).list().await?;

    Ok(Json(orders.iter().map(crate::models::Order::snapshot).collect()))
}
