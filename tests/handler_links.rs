mod common;

use axum::{Router, routing::post};
use axum_test::TestServer;
use linkpulse::api::handlers::create_link_handler;
use serde_json::json;
use sqlx::SqlitePool;

fn make_server(pool: SqlitePool) -> TestServer {
    let (state, _rx) = common::create_test_state(pool);
    let app = Router::new()
        .route("/links", post(create_link_handler))
        .with_state(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_create_link_success() {
    let pool = common::create_test_pool().await;
    let server = make_server(pool.clone());

    let response = server
        .post("/links")
        .json(&json!({ "long_url": "https://example.com/some/long/path" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let body = response.json::<serde_json::Value>();
    let code = body["short_code"].as_str().unwrap();

    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["long_url"], "https://example.com/some/long/path");
    assert_eq!(
        body["full_short_url"],
        format!("{}/{}", common::TEST_BASE_URL, code)
    );

    let stored: String = sqlx::query_scalar("SELECT long_url FROM links WHERE short_code = ?")
        .bind(code)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, "https://example.com/some/long/path");
}

#[tokio::test]
async fn test_create_link_codes_are_distinct() {
    let pool = common::create_test_pool().await;
    let server = make_server(pool);

    let mut codes = std::collections::HashSet::new();
    for _ in 0..10 {
        let response = server
            .post("/links")
            .json(&json!({ "long_url": "https://example.com" }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        codes.insert(response.json::<serde_json::Value>()["short_code"].to_string());
    }

    assert_eq!(codes.len(), 10);
}

#[tokio::test]
async fn test_create_link_invalid_url() {
    let pool = common::create_test_pool().await;
    let server = make_server(pool);

    let response = server
        .post("/links")
        .json(&json!({ "long_url": "not a url" }))
        .await;

    response.assert_status_bad_request();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_create_link_empty_url() {
    let pool = common::create_test_pool().await;
    let server = make_server(pool);

    let response = server
        .post("/links")
        .json(&json!({ "long_url": "" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_link_missing_field() {
    let pool = common::create_test_pool().await;
    let server = make_server(pool);

    let response = server.post("/links").json(&json!({ "url": "https://example.com" })).await;

    response.assert_status_bad_request();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["message"], "Invalid request body");
}

#[tokio::test]
async fn test_create_link_malformed_json() {
    let pool = common::create_test_pool().await;
    let server = make_server(pool);

    let response = server
        .post("/links")
        .content_type("application/json")
        .text("{not json")
        .await;

    response.assert_status_bad_request();
}
