//! Product detail page and add-to-cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use minimart_core::wire::{ProductSummary, UserSummary};

use crate::clients::ClientError;
use crate::filters;
use crate::middleware::{OptionalUser, RequireUser, cached_order, set_cached_order};
use crate::routes::auth::MessageQuery;
use crate::state::AppState;

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub user: Option<UserSummary>,
    pub cart_count: i64,
    pub product: ProductSummary,
    pub error: Option<String>,
    pub success: Option<String>,
}

fn message_for(code: &str) -> String {
    match code {
        "cart" => "Could not add the item to your cart. Please try again.".to_owned(),
        _ => "Service unavailable. Please try again later.".to_owned(),
    }
}

/// Display a product page.
#[instrument(skip(state, session, current))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(current): OptionalUser,
    Path(slug): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Response {
    let product = match state.products().get(&slug).await {
        Ok(Some(product)) => product,
        Ok(None) => return Redirect::to("/?error=product_not_found").into_response(),
        Err(e) => {
            tracing::error!("Error fetching product {slug}: {e}");
            return Redirect::to("/?error=unavailable").into_response();
        }
    };

    let cart_count = cached_order(&session)
        .await
        .map_or(0, |order| order.total_quantity());

    ProductTemplate {
        user: current.map(|c| c.user),
        cart_count,
        product,
        error: query.error.as_deref().map(message_for),
        success: query
            .success
            .as_deref()
            .map(|_| "Item added to your cart.".to_owned()),
    }
    .into_response()
}

/// Add one unit of the product to the cart, then return to the product page.
#[instrument(skip(state, session, current))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    RequireUser(current): RequireUser,
    Path(slug): Path<String>,
) -> Response {
    let product = match state.products().get(&slug).await {
        Ok(Some(product)) => product,
        Ok(None) => return Redirect::to("/?error=product_not_found").into_response(),
        Err(e) => {
            tracing::error!("Error fetching product {slug}: {e}");
            return Redirect::to("/?error=unavailable").into_response();
        }
    };

    match state
        .orders()
        .add_item(&current.api_key, product.id, 1)
        .await
    {
        Ok(order) => {
            if let Err(e) = set_cached_order(&session, &order).await {
                tracing::error!("Failed to cache order snapshot: {e}");
            }
            Redirect::to(&format!("/product/{slug}?success=added")).into_response()
        }
        Err(ClientError::UnexpectedStatus { status, .. })
            if status == reqwest::StatusCode::UNAUTHORIZED =>
        {
            // The cached key was revoked or rotated; start over
            Redirect::to("/login").into_response()
        }
        Err(e) => {
            tracing::error!("Error adding product to cart: {e}");
            Redirect::to(&format!("/product/{slug}?error=cart")).into_response()
        }
    }
}
