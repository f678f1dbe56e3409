//! Session-related types.
//!
//! The session is the storefront's only state: a bearer API key plus cached
//! snapshots of the current user and order. Snapshots are refreshed
//! opportunistically (login, add-to-cart, authenticated page loads) and can
//! go stale in between; the next successful fetch overwrites them.

use serde::{Deserialize, Serialize};

use minimart_core::{ApiKey, wire::UserSummary};

/// Session-stored identity: the bearer key and the cached user snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Bearer key for the backend services.
    pub api_key: ApiKey,
    /// Cached user snapshot from the directory.
    pub user: UserSummary,
}

/// Session keys.
pub mod session_keys {
    /// Key for the bearer API key.
    pub const USER_API_KEY: &str = "user_api_key";

    /// Key for the cached user snapshot.
    pub const USER: &str = "user";

    /// Key for the cached order snapshot.
    pub const ORDER: &str = "order";
}
