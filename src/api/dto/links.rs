//! DTOs for link creation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The original URL to shorten.
    #[validate(
        length(min = 1, message = "URL must not be empty"),
        url(message = "Invalid URL format")
    )]
    pub long_url: String,
}

/// Response for a newly created short link.
#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub short_code: String,
    pub long_url: String,
    pub full_short_url: String,
}
