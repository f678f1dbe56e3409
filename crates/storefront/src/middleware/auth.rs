//! Authentication extractors and session helpers.
//!
//! The storefront considers a browser "logged in" when the session holds a
//! bearer API key and a user snapshot. The key may still have been revoked
//! or rotated server-side; backend calls discover that and the handlers
//! degrade to a login redirect.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use minimart_core::{ApiKey, wire::OrderSnapshot, wire::UserSummary};

use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in session.
///
/// If the session holds no user, the request is redirected to the login
/// page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(current): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", current.user.username)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Rejection for [`RequireUser`]: redirect to the login page.
pub struct RedirectToLogin;

impl IntoResponse for RedirectToLogin {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = RedirectToLogin;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or(RedirectToLogin)?;

        current_user(session).await.map(Self).ok_or(RedirectToLogin)
    }
}

/// Extractor that optionally gets the logged-in user.
///
/// Unlike `RequireUser`, this does not reject the request.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current = match parts.extensions.get::<Session>() {
            Some(session) => current_user(session).await,
            None => None,
        };

        Ok(Self(current))
    }
}

/// Assemble the current user from the session, if both halves are present.
async fn current_user(session: &Session) -> Option<CurrentUser> {
    let api_key: ApiKey = session
        .get(session_keys::USER_API_KEY)
        .await
        .ok()
        .flatten()?;
    let user: UserSummary = session.get(session_keys::USER).await.ok().flatten()?;

    Some(CurrentUser { api_key, user })
}

/// Store the bearer key and user snapshot after a successful login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    api_key: &ApiKey,
    user: &UserSummary,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::USER_API_KEY, api_key).await?;
    session.insert(session_keys::USER, user).await
}

/// Overwrite the cached order snapshot.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_cached_order(
    session: &Session,
    order: &OrderSnapshot,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ORDER, order).await
}

/// Read the cached order snapshot, if any.
pub async fn cached_order(session: &Session) -> Option<OrderSnapshot> {
    session.get(session_keys::ORDER).await.ok().flatten()
}

/// Remove and return the cached order snapshot.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn take_cached_order(
    session: &Session,
) -> Result<Option<OrderSnapshot>, tower_sessions::session::Error> {
    session.remove(session_keys::ORDER).await
}
