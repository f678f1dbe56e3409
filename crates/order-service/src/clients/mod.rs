//! HTTP clients for sibling services.

mod user;

pub use user::{UserClientError, UserDirectoryClient};
