//! Minimart Storefront - public e-commerce site.
//!
//! # Architecture
//!
//! - Axum web framework with Askama server-side templates
//! - Cookie session (signed; records in `SQLite` via tower-sessions)
//! - The three backend services (user, product, order) are remote HTTP
//!   dependencies; this binary holds no business data of its own
//!
//! The session caches the bearer API key plus user and order snapshots;
//! snapshots can go stale between refreshes and are simply overwritten by
//! the next successful fetch.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions::service::SignedCookie;
use tower_sessions_sqlx_store::SqliteStore;

pub mod clients;
pub mod config;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Build the complete application router.
#[must_use]
pub fn app(state: AppState, session_layer: SessionManagerLayer<SqliteStore, SignedCookie>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the session store is reachable before returning OK.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
