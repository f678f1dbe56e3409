//! Integration test harness for Minimart.
//!
//! Spawns the real axum applications - user directory, product catalog,
//! order ledger and (optionally) the storefront - on ephemeral ports with
//! in-memory `SQLite` databases, and exposes their base URLs plus a reqwest
//! client.
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestContext::spawn().await;
//! let response = ctx.client
//!     .get(format!("{}/health", ctx.user_url))
//!     .send()
//!     .await?;
//! assert_eq!(response.status(), 200);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::net::TcpListener;
use tower_sessions_sqlx_store::SqliteStore;

/// Base URLs of a full running backend plus a shared HTTP client.
pub struct TestContext {
    /// Plain client (no cookie jar) for the JSON APIs.
    pub client: reqwest::Client,
    /// User directory base URL.
    pub user_url: String,
    /// Product catalog base URL.
    pub product_url: String,
    /// Order ledger base URL.
    pub order_url: String,
}

impl TestContext {
    /// Spawn the three backend services.
    ///
    /// # Panics
    ///
    /// Panics if a database, migration or listener fails; tests cannot
    /// proceed without the full backend.
    pub async fn spawn() -> Self {
        let user_url = spawn_user_service().await;
        let product_url = spawn_product_service().await;
        let order_url = spawn_order_service(&user_url).await;

        Self {
            client: reqwest::Client::new(),
            user_url,
            product_url,
            order_url,
        }
    }

    /// Spawn the storefront in front of this backend; returns its base URL.
    ///
    /// # Panics
    ///
    /// Panics if the session store or listener fails.
    pub async fn spawn_storefront(&self) -> String {
        let pool = memory_pool().await;
        let store = SqliteStore::new(pool.clone());
        store.migrate().await.expect("migrate session store");

        let config = minimart_storefront::config::StorefrontConfig {
            database_url: "sqlite::memory:".to_owned(),
            host: "127.0.0.1".parse().expect("ip"),
            port: 0,
            base_url: "http://127.0.0.1:5000".to_owned(),
            session_secret: None,
            services: minimart_storefront::config::ServiceUrls {
                user: self.user_url.clone(),
                product: self.product_url.clone(),
                order: self.order_url.clone(),
            },
        };

        let session_layer = minimart_storefront::middleware::create_session_layer(store, &config);
        let state = minimart_storefront::AppState::new(config, pool);
        let app = minimart_storefront::app(state, session_layer);

        serve(app).await
    }
}

/// In-memory `SQLite` pool pinned to a single connection (each connection
/// would otherwise get its own empty database).
async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect sqlite memory")
}

/// Bind an ephemeral port, serve the app in the background, return its URL.
async fn serve(app: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });

    format!("http://{addr}")
}

async fn spawn_user_service() -> String {
    let pool = memory_pool().await;
    minimart_user_service::db::MIGRATOR
        .run(&pool)
        .await
        .expect("migrate users");

    let config = minimart_user_service::config::UserServiceConfig {
        database_url: "sqlite::memory:".to_owned(),
        host: "127.0.0.1".parse().expect("ip"),
        port: 0,
    };

    serve(minimart_user_service::app(
        minimart_user_service::AppState::new(config, pool),
    ))
    .await
}

async fn spawn_product_service() -> String {
    let pool = memory_pool().await;
    minimart_product_service::db::MIGRATOR
        .run(&pool)
        .await
        .expect("migrate products");

    let config = minimart_product_service::config::ProductServiceConfig {
        database_url: "sqlite::memory:".to_owned(),
        host: "127.0.0.1".parse().expect("ip"),
        port: 0,
    };

    serve(minimart_product_service::app(
        minimart_product_service::AppState::new(config, pool),
    ))
    .await
}

async fn spawn_order_service(user_url: &str) -> String {
    let pool = memory_pool().await;
    minimart_order_service::db::MIGRATOR
        .run(&pool)
        .await
        .expect("migrate orders");

    let config = minimart_order_service::config::OrderServiceConfig {
        database_url: "sqlite::memory:".to_owned(),
        host: "127.0.0.1".parse().expect("ip"),
        port: 0,
        user_service_url: user_url.to_owned(),
    };

    serve(minimart_order_service::app(
        minimart_order_service::AppState::new(config, pool),
    ))
    .await
}
