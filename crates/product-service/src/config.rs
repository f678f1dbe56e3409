//! Product service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `PRODUCT_SERVICE_DATABASE_URL` - `SQLite` connection string
//!   (default: `sqlite:minimart-products.db`)
//! - `PRODUCT_SERVICE_HOST` - Bind address (default: 127.0.0.1)
//! - `PRODUCT_SERVICE_PORT` - Listen port (default: 5002)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Product service configuration.
#[derive(Debug, Clone)]
pub struct ProductServiceConfig {
    /// `SQLite` database connection URL.
    pub database_url: String,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
}

impl ProductServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_env_or_default(
            "PRODUCT_SERVICE_DATABASE_URL",
            "sqlite:minimart-products.db",
        );
        let host = get_env_or_default("PRODUCT_SERVICE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PRODUCT_SERVICE_HOST".to_owned(), e.to_string())
            })?;
        let port = get_env_or_default("PRODUCT_SERVICE_PORT", "5002")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PRODUCT_SERVICE_PORT".to_owned(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
