//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_valid_code;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{short_code}`
///
/// # Request Flow
///
/// 1. Reject codes outside the short code alphabet without a lookup
/// 2. Resolve the link through the link service
/// 3. Offer a click event to the click queue
/// 4. Return 302 Found with `Location` set to the long URL
///
/// # Click Tracking
///
/// The enqueue never waits. When the queue is full the click is dropped and
/// counted; the redirect is served either way.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    if !is_valid_code(&short_code) {
        return Err(AppError::not_found(
            "Short link not found",
            json!({ "short_code": short_code }),
        ));
    }

    let link = state
        .link_service
        .get_link_by_short_code(&short_code)
        .await?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    let event = ClickEvent::new(link.id, user_agent, addr.ip().to_string());
    if !state.click_queue.try_enqueue(event) {
        tracing::debug!(short_code = %link.short_code, "Click not recorded");
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, link.long_url)]))
}
