#![allow(dead_code)]

use axum::extract::ConnectInfo;
use chrono::Utc;
use linkpulse::domain::click_queue::{ClickQueue, ClickReceiver};
use linkpulse::infrastructure::database::run_migrations;
use linkpulse::state::AppState;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

pub const TEST_BASE_URL: &str = "http://localhost:8080";

/// Fresh in-memory database with migrations applied.
///
/// A single connection is kept open for the pool's lifetime; an in-memory
/// SQLite database disappears with its last connection.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    run_migrations(&pool).await.unwrap();
    pool
}

pub async fn create_test_link(pool: &SqlitePool, code: &str, url: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO links (short_code, long_url, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(code)
    .bind(url)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_click(pool: &SqlitePool, link_id: i64, ip: &str) {
    sqlx::query(
        "INSERT INTO clicks (link_id, timestamp, user_agent, ip_address) VALUES (?, ?, 'test-agent', ?)",
    )
    .bind(link_id)
    .bind(Utc::now())
    .bind(ip)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn count_clicks(pool: &SqlitePool, link_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clicks WHERE link_id = ?")
        .bind(link_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_test_state(pool: SqlitePool) -> (AppState, ClickReceiver) {
    create_test_state_with_capacity(pool, 100)
}

pub fn create_test_state_with_capacity(
    pool: SqlitePool,
    capacity: usize,
) -> (AppState, ClickReceiver) {
    let (queue, receiver) = ClickQueue::new(capacity);
    let state = AppState::new(Arc::new(pool), TEST_BASE_URL, queue);
    (state, receiver)
}

/// Injects a fixed peer address, standing in for
/// `into_make_service_with_connect_info` under the test transport.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
