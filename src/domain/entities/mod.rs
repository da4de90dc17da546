//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs use separate structs
//! (`NewLink`, `NewClick`) that lack the durable identity assigned by the store.
//!
//! - [`Link`] - A short code mapped to a destination URL
//! - [`Click`] - A persisted redirect event

pub mod click;
pub mod link;

pub use click::{Click, NewClick};
pub use link::{Link, NewLink};
