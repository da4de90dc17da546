//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers, the CLI and background tasks.
//!
//! - [`services::link_service::LinkService`] - Short link creation, lookup and stats
//! - [`services::health_monitor::HealthMonitor`] - Periodic destination reachability checks

pub mod services;
