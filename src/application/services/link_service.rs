//! Link creation and retrieval service.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, is_reserved_code};

/// Maximum number of short code candidates tried per creation.
pub const MAX_ATTEMPTS: usize = 5;

/// Source of short code candidates.
pub type CodeGenerator = Arc<dyn Fn() -> Result<String, getrandom::Error> + Send + Sync>;

/// A link together with its click total.
#[derive(Debug, Clone)]
pub struct LinkStats {
    pub link: Link,
    pub total_clicks: i64,
}

/// Service for creating and retrieving shortened links.
///
/// Owns the short code generation loop: random candidates are checked
/// against the store and retried on collision up to [`MAX_ATTEMPTS`] times.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    base_url: String,
    generate: CodeGenerator,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin short URLs are built from.
    pub fn new(link_repository: Arc<L>, base_url: impl Into<String>) -> Self {
        Self {
            link_repository,
            base_url: base_url.into(),
            generate: Arc::new(generate_code),
        }
    }

    /// Replaces the random code source.
    pub fn with_code_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn() -> Result<String, getrandom::Error> + Send + Sync + 'static,
    {
        self.generate = Arc::new(generator);
        self
    }

    /// Creates a short link for `long_url`.
    ///
    /// The URL is expected to be validated by the caller.
    ///
    /// # Code Generation
    ///
    /// - Generates a 6-character alphanumeric code
    /// - An existing code counts as a collision and triggers a fresh attempt
    /// - A reserved code (`health`, ...) counts as a collision
    /// - A uniqueness violation on insert (a concurrent creation won the race)
    ///   also counts as a collision
    ///
    /// # Errors
    ///
    /// Returns [`AppError::GenerationFailed`] if all attempts collide.
    /// Returns [`AppError::Storage`] immediately on any other database error.
    /// Returns [`AppError::Internal`] if the random source fails.
    pub async fn create_link(&self, long_url: String) -> Result<Link, AppError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let code = (self.generate)().map_err(|e| {
                AppError::internal(
                    "Failed to generate short code",
                    json!({ "reason": e.to_string() }),
                )
            })?;

            if is_reserved_code(&code) {
                tracing::warn!(
                    short_code = %code,
                    attempt,
                    max_attempts = MAX_ATTEMPTS,
                    "Short code is reserved, retrying"
                );
                continue;
            }

            if self
                .link_repository
                .find_by_short_code(&code)
                .await?
                .is_some()
            {
                tracing::warn!(
                    short_code = %code,
                    attempt,
                    max_attempts = MAX_ATTEMPTS,
                    "Short code already exists, retrying"
                );
                continue;
            }

            let new_link = NewLink {
                short_code: code.clone(),
                long_url: long_url.clone(),
                created_at: Utc::now(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    tracing::info!(short_code = %link.short_code, link_id = link.id, "Link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => {
                    tracing::warn!(
                        short_code = %code,
                        attempt,
                        max_attempts = MAX_ATTEMPTS,
                        "Short code taken concurrently, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::generation_failed(
            "Failed to generate unique short code",
            json!({ "attempts": MAX_ATTEMPTS }),
        ))
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn get_link_by_short_code(&self, short_code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_short_code(short_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "short_code": short_code }))
            })
    }

    /// Retrieves a link together with the number of recorded clicks.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_link_by_short_code`].
    pub async fn get_link_stats(&self, short_code: &str) -> Result<LinkStats, AppError> {
        let link = self.get_link_by_short_code(short_code).await?;
        let total_clicks = self
            .link_repository
            .count_clicks_by_link_id(link.id)
            .await?;

        Ok(LinkStats { link, total_clicks })
    }

    /// Constructs the full short URL for a code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), short_code)
    }
}
