//! Infrastructure layer for external integrations.
//!
//! Implements interfaces defined by the domain layer.
//!
//! - [`database`] - SQLite pool setup and schema migrations
//! - [`persistence`] - SQLite repository implementations
//! - [`probe`] - HTTP reachability probe

pub mod database;
pub mod persistence;
pub mod probe;
