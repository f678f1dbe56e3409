//! Database operations for the order ledger.
//!
//! ## Tables
//!
//! - `orders` - One row per order; a partial unique index keeps at most one
//!   open order per user
//! - `order_items` - Line items, unique per (order, product)
//!
//! # Migrations
//!
//! Migrations live in `crates/order-service/migrations/` and are embedded in
//! [`MIGRATOR`]. Run them via:
//! ```bash
//! cargo run -p minimart-cli -- migrate order
//! ```

pub mod orders;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

/// Embedded migrations for the order database.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors returned by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The targeted row does not exist.
    #[error("not found")]
    NotFound,
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if missing. Foreign keys are enabled so the
/// order -> item cascade applies.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
