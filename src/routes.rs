//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_code}`               - Short link redirect
//! - `GET  /health`                     - Health check: database, click queue
//! - `POST /links`                      - Create a short link
//! - `GET  /links/{short_code}/stats`   - Link statistics
//! - `/api/v1/links...`                 - Same link routes under a versioned prefix
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// The router owns `state`, and with it the click queue producer. Dropping
/// the router closes the queue once no other clone is alive.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/{short_code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(api::routes::link_routes())
        .nest("/api/v1", api::routes::link_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
