//! Link API route configuration.

use crate::api::handlers::{create_link_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management routes.
///
/// # Endpoints
///
/// - `POST /links`                     - Create a short link
/// - `GET  /links/{short_code}/stats`  - Click statistics for a link
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler))
        .route("/links/{short_code}/stats", get(stats_handler))
}
