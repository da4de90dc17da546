//! SQLite repository implementations.
//!
//! Concrete implementations of domain repository traits using runtime-checked
//! SQLx queries.
//!
//! - [`SqliteLinkRepository`] - Link storage, lookup and click counting
//! - [`SqliteClickRepository`] - Click persistence

pub mod sqlite_click_repository;
pub mod sqlite_link_repository;

pub use sqlite_click_repository::SqliteClickRepository;
pub use sqlite_link_repository::SqliteLinkRepository;
