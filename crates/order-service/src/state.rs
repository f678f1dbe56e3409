//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::clients::UserDirectoryClient;
use crate::config::OrderServiceConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: OrderServiceConfig,
    pool: SqlitePool,
    users: UserDirectoryClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The user directory client is built from the configured base URL.
    #[must_use]
    pub fn new(config: OrderServiceConfig, pool: SqlitePool) -> Self {
        let users = UserDirectoryClient::new(&config.user_service_url);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                users,
            }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &OrderServiceConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the user directory client.
    #[must_use]
    pub fn users(&self) -> &UserDirectoryClient {
        &self.inner.users
    }
}
