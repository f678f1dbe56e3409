//! HTTP middleware for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. `TraceLayer` (request tracing)
//! 2. Session layer (tower-sessions with `SQLite` store, signed cookie)

pub mod auth;
pub mod session;

pub use auth::{
    OptionalUser, RequireUser, cached_order, set_cached_order, set_current_user,
    take_cached_order,
};
pub use session::create_session_layer;
