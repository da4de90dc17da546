//! # linkpulse
//!
//! A URL shortener with asynchronous click analytics and destination health
//! monitoring, built with Axum and SQLite.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, repository traits, the click queue and its workers
//! - **Application Layer** ([`application`]) - Link service and health monitor
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite persistence and HTTP probes
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Random 6-character short codes with bounded collision retry
//! - Redirects that never wait on analytics: clicks go through a bounded
//!   queue and are dropped when it is full
//! - A fixed pool of workers persisting clicks
//! - Periodic reachability checks of every destination URL
//!
//! ## Quick Start
//!
//! ```bash
//! linkpulse migrate
//! linkpulse run-server
//! ```
//!
//! ## Configuration
//!
//! Loaded from `configs/config.yaml` and environment variables via
//! [`config::Config`]. See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{HealthMonitor, LinkService, LinkStats};
    pub use crate::domain::click_event::ClickEvent;
    pub use crate::domain::click_queue::{ClickQueue, ClickReceiver};
    pub use crate::domain::click_worker::ClickWorkerPool;
    pub use crate::domain::entities::{Click, Link, NewClick, NewLink};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
