//! Router-level tests for the product catalog API.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use minimart_product_service::config::ProductServiceConfig;
use minimart_product_service::{AppState, app, db};

async fn test_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect");
    db::MIGRATOR.run(&pool).await.expect("migrate");

    let config = ProductServiceConfig {
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

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

const WIDGET: &str = "name=Widget&slug=widget&image=widget.png&price=19.99";

#[tokio::test]
async fn create_then_lookup_roundtrips_all_fields() {
    let app = test_app().await;

    let (status, body) = send(&app, post_form("/api/product/create", WIDGET)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product added successfully");
    assert_eq!(body["product"]["slug"], "widget");

    let (status, body) = send(&app, get("/api/product/widget")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["name"], "Widget");
    assert_eq!(body["result"]["slug"], "widget");
    assert_eq!(body["result"]["image"], "widget.png");
    assert_eq!(body["result"]["price"], "19.99");
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/api/product/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn list_wraps_products_in_results() {
    let app = test_app().await;
    let (status, _) = send(&app, post_form("/api/product/create", WIDGET)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        post_form(
            "/api/product/create",
            "name=Gadget&slug=gadget&image=gadget.png&price=5.00",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/api/products")).await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().expect("results");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["slug"], "widget");
    assert_eq!(results[1]["slug"], "gadget");
}

#[tokio::test]
async fn create_rejects_missing_and_invalid_fields() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        post_form(
            "/api/product/create",
            "name=&slug=Bad%20Slug&image=&price=cheap",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = body["fields"].as_array().expect("fields");
    assert!(fields.contains(&serde_json::json!("name")));
    assert!(fields.contains(&serde_json::json!("slug")));
    assert!(fields.contains(&serde_json::json!("image")));
    assert!(fields.contains(&serde_json::json!("price")));
}

#[tokio::test]
async fn create_rejects_negative_price() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        post_form(
            "/api/product/create",
            "name=Widget&slug=widget&image=widget.png&price=-1",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = body["fields"].as_array().expect("fields");
    assert_eq!(fields, &vec![serde_json::json!("price")]);
}

#[tokio::test]
async fn create_rejects_duplicate_slug() {
    let app = test_app().await;
    let (status, _) = send(&app, post_form("/api/product/create", WIDGET)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, post_form("/api/product/create", WIDGET)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "slug already exists");
}

#[tokio::test]
async fn empty_catalog_lists_no_results() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/api/products")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().expect("results").len(), 0);
}
