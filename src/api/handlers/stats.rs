//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click statistics for a short link.
///
/// # Endpoint
///
/// `GET /links/{short_code}/stats`
///
/// Clicks are persisted asynchronously, so a redirect served a moment ago may
/// not be counted yet.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.link_service.get_link_stats(&short_code).await?;

    Ok(Json(StatsResponse {
        short_code: stats.link.short_code,
        long_url: stats.link.long_url,
        total_clicks: stats.total_clicks,
        created_at: stats.link.created_at,
    }))
}
