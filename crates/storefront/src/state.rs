//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the session-store pool and one client
/// per backend service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: SqlitePool,
    users: UserClient,
    products: ProductClient,
    orders: OrderClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Service clients are built from the configured base URLs.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: SqlitePool) -> Self {
        let users = UserClient::new(&config.services.user);
        let products = ProductClient::new(&config.services.product);
        let orders = OrderClient::new(&config.services.order);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                users,
                products,
                orders,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the session-store connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the user directory client.
    #[must_use]
    pub fn users(&self) -> &UserClient {
        &self.inner.users
    }

    /// Get a reference to the product catalog client.
    #[must_use]
    pub fn products(&self) -> &ProductClient {
        &self.inner.products
    }

    /// Get a reference to the order ledger client.
    #[must_use]
    pub fn orders(&self) -> &OrderClient {
        &self.inner.orders
    }
}
