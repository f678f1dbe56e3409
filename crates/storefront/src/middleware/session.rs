//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions: the cookie holds a
//! signed session ID, the session record itself lives server-side.

use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::{StorefrontConfig, secret_bytes};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "minimart_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with a `SQLite` store and a signed cookie.
///
/// The signing key is derived from the configured secret; without one an
/// ephemeral key is generated and sessions die with the process.
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &StorefrontConfig,
) -> SessionManagerLayer<SqliteStore, SignedCookie> {
    let key = config.session_secret.as_ref().map_or_else(
        || {
            tracing::warn!(
                "STOREFRONT_SESSION_SECRET not set; using an ephemeral signing key, \
                 sessions will not survive a restart"
            );
            Key::generate()
        },
        |secret| Key::from(secret_bytes(secret)),
    );

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}
