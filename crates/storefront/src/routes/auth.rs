//! Authentication route handlers: login, registration, logout.
//!
//! Errors surface as `?error=` codes on a redirect back to the form, which
//! the page templates render as banner messages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use minimart_core::wire::UserSummary;

use crate::clients::user::Registration;
use crate::middleware::{OptionalUser, set_cached_order, set_current_user};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<UserSummary>,
    pub cart_count: i64,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub user: Option<UserSummary>,
    pub cart_count: i64,
    pub error: Option<String>,
}

fn login_error_for(code: &str) -> String {
    match code {
        "credentials" => "Invalid login credentials. Please try again.".to_owned(),
        "session" => "Session error. Please try logging in again.".to_owned(),
        _ => "Service unavailable. Please try again later.".to_owned(),
    }
}

fn register_error_for(code: &str) -> String {
    match code {
        "username_taken" => "Username already exists. Please choose another.".to_owned(),
        "invalid" => "Registration failed. Please check the fields.".to_owned(),
        _ => "Service unavailable. Please try again later.".to_owned(),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalUser(current): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    // Already logged in: nothing to do here
    if current.is_some() {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        user: None,
        cart_count: 0,
        error: query.error.as_deref().map(login_error_for),
        success: query
            .success
            .as_deref()
            .map(|_| "Registration successful. Please login.".to_owned()),
    }
    .into_response()
}

/// Handle login form submission.
///
/// On success the session caches the API key, the user snapshot and (when
/// one exists) the open order snapshot.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let api_key = match state.users().login(&form.username, &form.password).await {
        Ok(Some(api_key)) => api_key,
        Ok(None) => {
            tracing::info!("login failed");
            return Redirect::to("/login?error=credentials").into_response();
        }
        Err(e) => {
            tracing::error!("user service unavailable during login: {e}");
            return Redirect::to("/login?error=unavailable").into_response();
        }
    };

    let user = match state.users().current(&api_key).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            // The key we were just handed does not resolve; treat as a failure
            tracing::warn!("freshly minted api key did not resolve");
            return Redirect::to("/login?error=credentials").into_response();
        }
        Err(e) => {
            tracing::error!("user service unavailable after login: {e}");
            return Redirect::to("/login?error=unavailable").into_response();
        }
    };

    if let Err(e) = set_current_user(&session, &api_key, &user).await {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/login?error=session").into_response();
    }

    // Opportunistically cache the open order, if any
    if let Ok(Some(order)) = state.orders().get(&api_key).await
        && let Err(e) = set_cached_order(&session, &order).await
    {
        tracing::error!("Failed to cache order snapshot: {e}");
    }

    tracing::info!(user_id = %user.id, "user logged in");

    Redirect::to("/").into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    OptionalUser(current): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    if current.is_some() {
        return Redirect::to("/").into_response();
    }

    RegisterTemplate {
        user: None,
        cart_count: 0,
        error: query.error.as_deref().map(register_error_for),
    }
    .into_response()
}

/// Handle registration form submission.
#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    // Pre-check the username so the common failure gets a precise message
    match state.users().exists(&form.username).await {
        Ok(true) => return Redirect::to("/register?error=username_taken").into_response(),
        Ok(false) => {}
        Err(e) => {
            tracing::error!("user service unavailable during registration: {e}");
            return Redirect::to("/register?error=unavailable").into_response();
        }
    }

    let registration = Registration {
        email: &form.email,
        password: &form.password,
        first_name: &form.first_name,
        last_name: &form.last_name,
        username: &form.username,
    };

    match state.users().register(&registration).await {
        Ok(Some(user)) => {
            tracing::info!(user_id = %user.id, "user registered");
            Redirect::to("/login?success=registered").into_response()
        }
        Ok(None) => Redirect::to("/register?error=invalid").into_response(),
        Err(e) => {
            tracing::error!("user service unavailable during registration: {e}");
            Redirect::to("/register?error=unavailable").into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Revokes the bearer key (best effort) and destroys the session.
#[instrument(skip(state, session, current))]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(current): OptionalUser,
) -> Response {
    if let Some(current) = current {
        // Revoke the key server-side; a failure only means the key lives
        // until the next login rotates it
        if let Err(e) = state.users().logout(&current.api_key).await {
            tracing::warn!("Failed to revoke api key on logout: {e}");
        }
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Redirect::to("/").into_response()
}
