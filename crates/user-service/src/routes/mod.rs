//! HTTP route handlers for the user directory.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (pings the database)
//!
//! POST /api/user/create            - Register a new user
//! POST /api/user/login             - Login, mints a fresh API key
//! POST /api/user/logout            - Logout, revokes the API key (bearer)
//! GET  /api/user                   - Current user for a bearer key
//! GET  /api/user/{username}/exists - Username availability check
//! GET  /api/users                  - All users (admin listing)
//! ```

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use minimart_core::{ApiKey, Username, wire};

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::extract::Bearer;
use crate::models::NewUser;
use crate::password;
use crate::state::AppState;

/// Create all API routes for the user service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/user/create", post(create))
        .route("/api/user/login", post(login))
        .route("/api/user/logout", post(logout))
        .route("/api/user", get(current_user))
        .route("/api/user/{username}/exists", get(exists))
        .route("/api/users", get(list))
}

// =============================================================================
// Form Types
// =============================================================================

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user.
#[instrument(skip(state, form), fields(username = %form.username))]
async fn create(
    State(state): State<AppState>,
    Form(form): Form<CreateUserForm>,
) -> Result<Json<wire::CreatedResponse<wire::UserSummary>>> {
    let mut invalid = Vec::new();

    let username = match Username::parse(&form.username) {
        Ok(username) => Some(username),
        Err(_) => {
            invalid.push("username".to_owned());
            None
        }
    };
    if form.email.is_empty() || !form.email.contains('@') {
        invalid.push("email".to_owned());
    }
    if form.password.is_empty() {
        invalid.push("password".to_owned());
    }
    if form.first_name.is_empty() {
        invalid.push("first_name".to_owned());
    }
    if form.last_name.is_empty() {
        invalid.push("last_name".to_owned());
    }

    let Some(username) = username else {
        return Err(AppError::Validation { fields: invalid });
    };
    if !invalid.is_empty() {
        return Err(AppError::Validation { fields: invalid });
    }

    let password_hash = password::hash_password(&form.password)?;

    let new = NewUser {
        username,
        email: form.email,
        first_name: form.first_name,
        last_name: form.last_name,
        password_hash,
    };

    let user = UserRepository::new(state.pool())
        .create(&new)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Database(other),
        })?;

    tracing::info!(user_id = %user.id, "user created");

    Ok(Json(wire::CreatedResponse {
        message: "User created successfully".to_owned(),
        result: user.summary(),
    }))
}

/// Login with username and password.
///
/// A successful login mints a fresh API key, invalidating whatever key was
/// stored before.
#[instrument(skip(state, form), fields(username = %form.username))]
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<wire::LoginResponse>> {
    let username =
        Username::parse(&form.username).map_err(|_| AppError::Unauthorized("Not logged in"))?;

    let repo = UserRepository::new(state.pool());

    let (user, password_hash) = repo
        .get_auth_by_username(&username)
        .await?
        .ok_or(AppError::Unauthorized("Not logged in"))?;

    password::verify_password(&form.password, &password_hash)?;

    let api_key = ApiKey::generate();
    repo.set_api_key(user.id, &api_key).await?;

    tracing::info!(user_id = %user.id, "login succeeded, api key rotated");

    Ok(Json(wire::LoginResponse {
        message: "Logged in".to_owned(),
        api_key,
    }))
}

/// Logout: revoke the bearer API key.
#[instrument(skip(state, key))]
async fn logout(
    State(state): State<AppState>,
    Bearer(key): Bearer,
) -> Result<Json<wire::MessageResponse>> {
    let repo = UserRepository::new(state.pool());

    let user = repo
        .get_by_api_key(&key)
        .await?
        .ok_or(AppError::Unauthorized("You are not logged in"))?;

    repo.clear_api_key(user.id).await?;

    tracing::info!(user_id = %user.id, "user logged out, api key revoked");

    Ok(Json(wire::MessageResponse::new("You are logged out")))
}

/// Current user for a bearer API key.
#[instrument(skip(state, key))]
async fn current_user(
    State(state): State<AppState>,
    Bearer(key): Bearer,
) -> Result<Json<wire::ResultResponse<wire::UserSummary>>> {
    let user = UserRepository::new(state.pool())
        .get_by_api_key(&key)
        .await?
        .ok_or(AppError::Unauthorized("Not logged in"))?;

    Ok(Json(wire::ResultResponse {
        result: user.summary(),
    }))
}

/// Username availability check.
#[instrument(skip(state))]
async fn exists(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<wire::ResultResponse<bool>>> {
    let username = Username::parse(&username)
        .map_err(|_| AppError::NotFound("Username not found".to_owned()))?;

    let user = UserRepository::new(state.pool())
        .get_by_username(&username)
        .await?;

    match user {
        Some(_) => Ok(Json(wire::ResultResponse { result: true })),
        None => Err(AppError::NotFound("Username not found".to_owned())),
    }
}

/// All users as a plain array.
#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<wire::UserSummary>>> {
    let users = UserRepository::new(state.pool()).list().await?;

    Ok(Json(users.iter().map(crate::models::User::summary).collect()))
}
