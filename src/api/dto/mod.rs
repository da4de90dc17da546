//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization and validator for input validation.

pub mod health;
pub mod links;
pub mod stats;
