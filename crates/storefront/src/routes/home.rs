//! Home page and product search.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use minimart_core::wire::{ProductSummary, UserSummary};

use crate::filters;
use crate::middleware::{OptionalUser, cached_order, set_cached_order, take_cached_order};
use crate::state::AppState;

/// Query parameters for error display on the home page.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub error: Option<String>,
}

/// Query parameters for the search page.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Home page template (also used for search results).
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<UserSummary>,
    pub cart_count: i64,
    pub products: Vec<ProductSummary>,
    pub warning: Option<String>,
    pub query: Option<String>,
}

/// Map a redirect error code to a user-visible banner message.
fn warning_for(code: &str) -> String {
    match code {
        "product_not_found" => "That product could not be found.".to_owned(),
        "empty_cart" => "No items found in your cart.".to_owned(),
        _ => "Service unavailable. Please try again later.".to_owned(),
    }
}

/// Case-insensitive substring filter over the product list.
///
/// The catalog has no search endpoint, so searching happens here.
fn filter_products(products: Vec<ProductSummary>, query: &str) -> Vec<ProductSummary> {
    let needle = query.to_lowercase();
    products
        .into_iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.slug.as_str().contains(&needle)
        })
        .collect()
}

/// Refresh the session's order snapshot for a logged-in user.
///
/// A transport failure keeps the stale snapshot; staleness is tolerated
/// until the next successful fetch overwrites it.
async fn refresh_order(state: &AppState, session: &Session, current: &crate::models::CurrentUser) {
    match state.orders().get(&current.api_key).await {
        Ok(Some(order)) => {
            if let Err(e) = set_cached_order(session, &order).await {
                tracing::error!("Failed to cache order snapshot: {e}");
            }
        }
        Ok(None) => {
            let _ = take_cached_order(session).await;
        }
        Err(e) => {
            tracing::warn!("Failed to refresh order snapshot: {e}");
        }
    }
}

/// Fetch all products, degrading to an empty list with a warning banner.
async fn load_products(state: &AppState) -> (Vec<ProductSummary>, Option<String>) {
    match state.products().list().await {
        Ok(products) => (products, None),
        Err(e) => {
            tracing::error!("Error fetching products from catalog: {e}");
            (
                Vec::new(),
                Some("Failed to retrieve products. Please try again later.".to_owned()),
            )
        }
    }
}

/// Display the home page with the product grid.
#[instrument(skip(state, session, current))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(current): OptionalUser,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    if let Some(current) = &current {
        refresh_order(&state, &session, current).await;
    }

    let (products, fetch_warning) = load_products(&state).await;
    let warning = query
        .error
        .as_deref()
        .map(warning_for)
        .or(fetch_warning);

    let cart_count = cached_order(&session)
        .await
        .map_or(0, |order| order.total_quantity());

    HomeTemplate {
        user: current.map(|c| c.user),
        cart_count,
        products,
        warning,
        query: None,
    }
}

/// Display search results.
#[instrument(skip(state, session, current))]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(current): OptionalUser,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let (products, warning) = load_products(&state).await;

    let term = query.q.unwrap_or_default();
    let products = if term.is_empty() {
        products
    } else {
        filter_products(products, &term)
    };

    let cart_count = cached_order(&session)
        .await
        .map_or(0, |order| order.total_quantity());

    HomeTemplate {
        user: current.map(|c| c.user),
        cart_count,
        products,
        warning,
        query: Some(term),
    }
}
