//! HTTP clients for the three backend services.
//!
//! Each client wraps a `reqwest::Client` behind an `Arc` so application state
//! stays cheaply cloneable. Calls are single synchronous requests with no
//! retry; route handlers decide whether a failure degrades the page or turns
//! into a redirect.

pub mod order;
pub mod product;
pub mod user;

pub use order::OrderClient;
pub use product::ProductClient;
pub use user::UserClient;

use thiserror::Error;

/// Errors from backend service clients.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection refused, timeout, bad body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a status outside the contract.
    #[error("unexpected status {status} from {service}")]
    UnexpectedStatus {
        service: &'static str,
        status: reqwest::StatusCode,
    },
}
