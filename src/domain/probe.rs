//! Reachability probe contract used by the health monitor.

use async_trait::async_trait;

/// Why a probe could not produce an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Issues a lightweight existence check against a destination URL.
///
/// # Implementations
///
/// - [`crate::infrastructure::probe::HttpProbe`] - HTTP `HEAD` via reqwest
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlProbe: Send + Sync {
    /// Returns the HTTP status code the destination answered with.
    ///
    /// Implementations enforce their own per-request timeout.
    async fn probe(&self, url: &str) -> Result<u16, ProbeError>;
}
