//! Router-level tests for the user directory API.
//!
//! Each test runs the real router against a fresh in-memory `SQLite`
//! database with the embedded migrations applied.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use minimart_user_service::config::UserServiceConfig;
use minimart_user_service::{AppState, app, db};

async fn test_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect");
    db::MIGRATOR.run(&pool).await.expect("migrate");

    let config = UserServiceConfig {
        database_url: "sqlite::memory:".to_owned(),
        host: "127.0.0.1".parse().expect("ip"),
        port: 0,
    };

    app(AppState::new(config, pool))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

fn post_form(uri: &str, body: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(key) = api_key {
        builder = builder.header(header::AUTHORIZATION, format!("Basic {key}"));
    }
    builder.body(Body::from(body.to_owned())).expect("request")
}

fn get(uri: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = api_key {
        builder = builder.header(header::AUTHORIZATION, format!("Basic {key}"));
    }
    builder.body(Body::empty()).expect("request")
}

const ALICE: &str =
    "email=alice%40example.com&password=pw123&first_name=Alice&last_name=Smith&username=alice";

async fn register_alice(app: &Router) {
    let (status, _) = send(app, post_form("/api/user/create", ALICE, None)).await;
    assert_eq!(status, StatusCode::OK);
}

async fn login_alice(app: &Router) -> String {
    let (status, body) = send(
        app,
        post_form("/api/user/login", "username=alice&password=pw123", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["api_key"].as_str().expect("api_key").to_owned()
}

#[tokio::test]
async fn register_returns_user_summary() {
    let app = test_app().await;

    let (status, body) = send(&app, post_form("/api/user/create", ALICE, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["result"]["username"], "alice");
    assert_eq!(body["result"]["email"], "alice@example.com");
    assert_eq!(body["result"]["first_name"], "Alice");
    assert!(body["result"]["id"].is_i64());
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let app = test_app().await;
    register_alice(&app).await;

    let (status, body) = send(&app, post_form("/api/user/create", ALICE, None)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "username already exists");
}

#[tokio::test]
async fn register_rejects_invalid_fields() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        post_form(
            "/api/user/create",
            "email=not-an-email&password=&first_name=A&last_name=B&username=bad%20name",
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = body["fields"].as_array().expect("fields");
    assert!(fields.contains(&serde_json::json!("username")));
    assert!(fields.contains(&serde_json::json!("email")));
    assert!(fields.contains(&serde_json::json!("password")));
}

#[tokio::test]
async fn login_returns_working_api_key() {
    let app = test_app().await;
    register_alice(&app).await;

    let key = login_alice(&app).await;

    let (status, body) = send(&app, get("/api/user", Some(&key))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["username"], "alice");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = test_app().await;
    register_alice(&app).await;

    let (status, body) = send(
        &app,
        post_form("/api/user/login", "username=alice&password=nope", None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not logged in");
}

#[tokio::test]
async fn login_rejects_unknown_user() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        post_form("/api/user/login", "username=nobody&password=pw", None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rotates_the_api_key() {
    let app = test_app().await;
    register_alice(&app).await;

    let first = login_alice(&app).await;
    let second = login_alice(&app).await;
    assert_ne!(first, second);

    // The old key no longer resolves
    let (status, _) = send(&app, get("/api/user", Some(&first))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The new one does
    let (status, _) = send(&app, get("/api/user", Some(&second))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn logout_revokes_the_api_key() {
    let app = test_app().await;
    register_alice(&app).await;
    let key = login_alice(&app).await;

    let (status, body) = send(&app, post_form("/api/user/logout", "", Some(&key))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "You are logged out");

    let (status, _) = send(&app, get("/api/user", Some(&key))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_valid_key_is_unauthorized() {
    let app = test_app().await;

    let (status, body) = send(&app, post_form("/api/user/logout", "", Some("bogus"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "You are not logged in");
}

#[tokio::test]
async fn unknown_bearer_key_is_unauthorized_not_an_error() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/api/user", Some("no-such-key"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not logged in");
}

#[tokio::test]
async fn missing_authorization_header_is_unauthorized() {
    let app = test_app().await;

    let (status, _) = send(&app, get("/api/user", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn exists_reports_known_and_unknown_usernames() {
    let app = test_app().await;
    register_alice(&app).await;

    let (status, body) = send(&app, get("/api/user/alice/exists", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], true);

    let (status, body) = send(&app, get("/api/user/bob/exists", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Username not found");
}

#[tokio::test]
async fn list_users_returns_plain_array() {
    let app = test_app().await;
    register_alice(&app).await;

    let (status, body) = send(&app, get("/api/users", None)).await;

    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().expect("array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "alice");
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = test_app().await;

    let (status, _) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get("/health/ready", None)).await;
    assert_eq!(status, StatusCode::OK);
}
