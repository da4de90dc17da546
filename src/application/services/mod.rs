//! Business logic services for the application layer.

pub mod health_monitor;
pub mod link_service;

pub use health_monitor::{HealthMonitor, LinkHealth, StateChange};
pub use link_service::{LinkService, LinkStats};
