//! Database migration commands.
//!
//! Each service embeds its own migrations; this command connects with the
//! service's database URL (same environment variables, same defaults) and
//! applies them.

use thiserror::Error;

/// Errors from migration commands.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

fn env_or(key: &str, default: &str) -> String {
    dotenvy::dotenv().ok();
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Run user directory migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the connection or a migration fails.
pub async fn user() -> Result<(), MigrationError> {
    let url = env_or("USER_SERVICE_DATABASE_URL", "sqlite:minimart-users.db");

    tracing::info!("Running user directory migrations...");
    let pool = minimart_user_service::db::create_pool(&url).await?;
    minimart_user_service::db::MIGRATOR.run(&pool).await?;

    tracing::info!("User directory migrations complete");
    Ok(())
}

/// Run product catalog migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the connection or a migration fails.
pub async fn product() -> Result<(), MigrationError> {
    let url = env_or(
        "PRODUCT_SERVICE_DATABASE_URL",
        "sqlite:minimart-products.db",
    );

    tracing::info!("Running product catalog migrations...");
    let pool = minimart_product_service::db::create_pool(&url).await?;
    minimart_product_service::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Product catalog migrations complete");
    Ok(())
}

/// Run order ledger migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the connection or a migration fails.
pub async fn order() -> Result<(), MigrationError> {
    let url = env_or("ORDER_SERVICE_DATABASE_URL", "sqlite:minimart-orders.db");

    tracing::info!("Running order ledger migrations...");
    let pool = minimart_order_service::db::create_pool(&url).await?;
    minimart_order_service::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Order ledger migrations complete");
    Ok(())
}
