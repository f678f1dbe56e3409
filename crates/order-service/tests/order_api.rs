//! Router-level tests for the order ledger API.
//!
//! The ledger authenticates by calling the user directory over HTTP, so each
//! test runs against a stub directory bound to an ephemeral port: one key
//! ("valid-key") resolves to alice, everything else is 401.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use minimart_order_service::config::OrderServiceConfig;
use minimart_order_service::{AppState, app, db};

const VALID_KEY: &str = "valid-key";
const ALICE_ID: i64 = 7;

/// Spawn a stub user directory; returns its base URL.
async fn spawn_user_directory_stub() -> String {
    async fn current_user(headers: header::HeaderMap) -> (StatusCode, Json<serde_json::Value>) {
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some("Basic valid-key");

        if authorized {
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "result": {
                        "id": ALICE_ID,
                        "username": "alice",
                        "email": "alice@example.com",
                        "first_name": "Alice",
                        "last_name": "Smith",
                    }
                })),
            )
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"message": "Not logged in"})),
            )
        }
    }

    let stub = Router::new().route("/api/user", get(current_user));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");

    tokio::spawn(async move {
        axum::serve(listener, stub).await.expect("stub server");
    });

    format!("http://{addr}")
}

async fn test_app_with_directory(user_service_url: String) -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect");
    db::MIGRATOR.run(&pool).await.expect("migrate");

    let config = OrderServiceConfig {
        database_url: "sqlite::memory:".to_owned(),
        host: "127.0.0.1".parse().expect("ip"),
        port: 0,
        user_service_url,
    };

    app(AppState::new(config, pool))
}

async fn test_app() -> Router {
    let url = spawn_user_directory_stub().await;
    test_app_with_directory(url).await
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

fn get_req(uri: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = api_key {
        builder = builder.header(header::AUTHORIZATION, format!("Basic {key}"));
    }
    builder.body(Body::empty()).expect("request")
}

#[tokio::test]
async fn first_add_creates_exactly_one_open_order() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        post_form("/api/order/add-item", "product_id=1&qty=2", Some(VALID_KEY)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["user_id"], ALICE_ID);
    assert_eq!(body["result"]["is_open"], true);

    let (status, body) = send(&app, get_req("/api/orders", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn repeat_add_accumulates_into_one_line_item() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        post_form("/api/order/add-item", "product_id=1&qty=2", Some(VALID_KEY)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        post_form("/api/order/add-item", "product_id=1&qty=3", Some(VALID_KEY)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let items = body["result"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_id"], 1);
    assert_eq!(items[0]["quantity"], 5);
}

#[tokio::test]
async fn distinct_products_get_distinct_line_items() {
    let app = test_app().await;

    for form in ["product_id=1&qty=1", "product_id=2&qty=4"] {
        let (status, _) = send(
            &app,
            post_form("/api/order/add-item", form, Some(VALID_KEY)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, get_req("/api/order", Some(VALID_KEY))).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["result"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["quantity"], 1);
    assert_eq!(items[1]["quantity"], 4);
}

#[tokio::test]
async fn qty_defaults_to_one_when_omitted() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        post_form("/api/order/add-item", "product_id=1", Some(VALID_KEY)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn add_item_rejects_non_positive_or_malformed_qty() {
    let app = test_app().await;

    for bad_qty in ["0", "-2", "abc"] {
        let (status, body) = send(
            &app,
            post_form(
                "/api/order/add-item",
                &format!("product_id=1&qty={bad_qty}"),
                Some(VALID_KEY),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "qty={bad_qty}");
        assert_eq!(body["fields"], serde_json::json!(["qty"]));
    }
}

#[tokio::test]
async fn add_item_rejects_malformed_product_id() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        post_form("/api/order/add-item", "product_id=widget&qty=1", Some(VALID_KEY)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], serde_json::json!(["product_id"]));
}

#[tokio::test]
async fn get_order_without_orders_reports_none_found() {
    let app = test_app().await;

    let (status, body) = send(&app, get_req("/api/order", Some(VALID_KEY))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No open order found");
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn checkout_without_open_order_is_an_error() {
    let app = test_app().await;

    let (status, body) = send(&app, post_form("/api/order/checkout", "", Some(VALID_KEY))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No open order to checkout");
}

#[tokio::test]
async fn checkout_closes_the_order_and_a_second_checkout_errors() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        post_form("/api/order/add-item", "product_id=1&qty=2", Some(VALID_KEY)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, post_form("/api/order/checkout", "", Some(VALID_KEY))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["is_open"], false);

    // The closed order is no longer the open one
    let (status, body) = send(&app, get_req("/api/order", Some(VALID_KEY))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No open order found");

    // Checking out again behaves like "no open order"
    let (status, _) = send(&app, post_form("/api/order/checkout", "", Some(VALID_KEY))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_after_checkout_starts_a_fresh_order() {
    let app = test_app().await;

    let (_, first) = send(
        &app,
        post_form("/api/order/add-item", "product_id=1&qty=1", Some(VALID_KEY)),
    )
    .await;
    send(&app, post_form("/api/order/checkout", "", Some(VALID_KEY))).await;

    let (status, second) = send(
        &app,
        post_form("/api/order/add-item", "product_id=1&qty=1", Some(VALID_KEY)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(second["result"]["id"], first["result"]["id"]);

    // Both orders remain in the ledger
    let (_, all) = send(&app, get_req("/api/orders", None)).await;
    assert_eq!(all.as_array().expect("array").len(), 2);
}

#[tokio::test]
async fn unknown_bearer_key_is_unauthorized_never_a_server_error() {
    let app = test_app().await;

    for request in [
        get_req("/api/order", Some("bogus")),
        post_form("/api/order/add-item", "product_id=1&qty=1", Some("bogus")),
        post_form("/api/order/checkout", "", Some("bogus")),
    ] {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Not logged in");
    }
}

#[tokio::test]
async fn missing_authorization_header_is_unauthorized() {
    let app = test_app().await;

    let (status, _) = send(&app, get_req("/api/order", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unreachable_user_directory_is_a_gateway_error() {
    // Port 1 is never listening; the relay call fails at the transport level
    let app = test_app_with_directory("http://127.0.0.1:1".to_owned()).await;

    let (status, body) = send(&app, get_req("/api/order", Some(VALID_KEY))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "User service unavailable");
}

#[tokio::test]
async fn orders_listing_is_empty_initially() {
    let app = test_app().await;

    let (status, body) = send(&app, get_req("/api/orders", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 0);
}
