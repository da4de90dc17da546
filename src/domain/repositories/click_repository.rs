//! Repository trait for click persistence.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for recording clicks.
///
/// Only the click workers write through this trait; reads go through
/// [`crate::domain::repositories::LinkRepository::count_clicks_by_link_id`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Records a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors, including a foreign key
    /// violation when the referenced link does not exist.
    async fn create(&self, new_click: NewClick) -> Result<Click, AppError>;
}
