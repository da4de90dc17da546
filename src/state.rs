//! Shared state injected into every HTTP handler.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::application::services::LinkService;
use crate::domain::click_queue::ClickQueue;
use crate::infrastructure::persistence::SqliteLinkRepository;

/// Link service wired to the SQLite store.
pub type AppLinkService = LinkService<SqliteLinkRepository>;

/// Application state shared across handlers.
///
/// Holds the producer side of the click queue. The queue closes once the
/// router, and with it every clone of this state, is dropped.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<SqlitePool>,
    pub link_service: Arc<AppLinkService>,
    pub click_queue: ClickQueue,
}

impl AppState {
    /// Builds the state from a pool, the public base URL and the queue producer.
    pub fn new(pool: Arc<SqlitePool>, base_url: &str, click_queue: ClickQueue) -> Self {
        let link_repository = Arc::new(SqliteLinkRepository::new(pool.clone()));
        let link_service = Arc::new(LinkService::new(link_repository, base_url));

        Self {
            pool,
            link_service,
            click_queue,
        }
    }
}
