//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Home page (product grid)
//! GET  /health           - Health check
//! GET  /search?q=        - Product search (frontend filter)
//!
//! # Auth
//! GET  /login            - Login page
//! POST /login            - Login action
//! GET  /register         - Register page
//! POST /register         - Register action
//! GET  /logout           - Logout action
//!
//! # Products & cart
//! GET  /product/{slug}   - Product detail
//! POST /product/{slug}   - Add to cart (requires login)
//! GET  /checkout         - Close the open order, then confirmation
//! GET  /order/thank-you  - Order confirmation
//! ```

pub mod auth;
pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::get,
};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page & search
        .route("/", get(home::home))
        .route("/search", get(home::search))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
        // Products & cart
        .route(
            "/product/{slug}",
            get(products::show).post(products::add_to_cart),
        )
        .route("/checkout", get(cart::checkout))
        .route("/order/thank-you", get(cart::thank_you))
}
