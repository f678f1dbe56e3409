//! Bearer API key type.
//!
//! An API key is an opaque token identifying a logged-in user. The user
//! directory mints a fresh key on every successful login, which invalidates
//! the previous one, and revokes the key on logout.

use core::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Number of random bytes in a freshly minted key.
const KEY_BYTES: usize = 32;

/// An opaque bearer API key.
///
/// Clients send the key in the `Authorization` header. For historical
/// compatibility the header value may carry a `Basic ` prefix even though the
/// key is not base64-encoded `user:password` credentials; [`ApiKey::from_header`]
/// strips the prefix when present.
///
/// `Debug` output is redacted so keys never leak into logs.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Mint a new random key (32 bytes, URL-safe base64).
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Wrap an existing key value (e.g., one read from the database).
    #[must_use]
    pub fn from_value(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parse an `Authorization` header value.
    ///
    /// Accepts either the bare key or `Basic <key>`; returns `None` for an
    /// empty value.
    #[must_use]
    pub fn from_header(header: &str) -> Option<Self> {
        let value = header.strip_prefix("Basic ").unwrap_or(header).trim();
        if value.is_empty() {
            return None;
        }
        Some(Self(value.to_owned()))
    }

    /// Render the key as an `Authorization` header value.
    #[must_use]
    pub fn to_header(&self) -> String {
        format!("Basic {}", self.0)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique_and_url_safe() {
        let a = ApiKey::generate();
        let b = ApiKey::generate();
        assert_ne!(a, b);
        assert!(
            a.as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_from_header_strips_basic_prefix() {
        let key = ApiKey::from_header("Basic abc123").expect("key");
        assert_eq!(key.as_str(), "abc123");
    }

    #[test]
    fn test_from_header_accepts_bare_key() {
        let key = ApiKey::from_header("abc123").expect("key");
        assert_eq!(key.as_str(), "abc123");
    }

    #[test]
    fn test_from_header_rejects_empty() {
        assert!(ApiKey::from_header("").is_none());
        assert!(ApiKey::from_header("Basic ").is_none());
    }

    #[test]
    fn test_header_roundtrip() {
        let key = ApiKey::generate();
        let parsed = ApiKey::from_header(&key.to_header()).expect("key");
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_debug_redacts() {
        let key = ApiKey::from_value("super-secret");
        let debug = format!("{key:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
