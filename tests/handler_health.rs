mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use linkpulse::api::handlers::health_handler;

#[tokio::test]
async fn test_health_endpoint_success() {
    let pool = common::create_test_pool().await;
    let (state, _rx) = common::create_test_state(pool);
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["capacity"], 100);
    assert_eq!(json["checks"]["click_queue"]["available"], 100);
    assert_eq!(json["checks"]["click_queue"]["dropped"], 0);
}

#[tokio::test]
async fn test_health_reports_dropped_clicks() {
    let pool = common::create_test_pool().await;
    let (state, _rx) = common::create_test_state_with_capacity(pool, 1);

    let event = || linkpulse::domain::click_event::ClickEvent::new(1, None, "127.0.0.1".to_string());
    assert!(state.click_queue.try_enqueue(event()));
    assert!(!state.click_queue.try_enqueue(event()));

    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert_eq!(json["checks"]["click_queue"]["available"], 0);
    assert_eq!(json["checks"]["click_queue"]["dropped"], 1);
}

#[tokio::test]
async fn test_health_degraded_when_click_queue_closed() {
    let pool = common::create_test_pool().await;
    let (state, rx) = common::create_test_state(pool);
    drop(rx);

    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "error");
}

#[tokio::test]
async fn test_health_degraded_when_database_closed() {
    let pool = common::create_test_pool().await;
    let (state, _rx) = common::create_test_state(pool.clone());
    pool.close().await;

    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json::<serde_json::Value>()["checks"]["database"]["status"],
        "error"
    );
}
