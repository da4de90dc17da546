//! HTTP `HEAD` probe backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::probe::{ProbeError, UrlProbe};

/// Hard per-request timeout for a single probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Probes destinations with an HTTP `HEAD` request.
///
/// Redirects are followed, so the reported status is the final hop's.
#[derive(Clone)]
pub struct HttpProbe {
    client: Client,
    timeout: Duration,
}

impl HttpProbe {
    /// Builds a probe with the default [`PROBE_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(PROBE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("linkpulse-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl UrlProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<u16, ProbeError> {
        let url = reqwest::Url::parse(url).map_err(|e| ProbeError::InvalidUrl(e.to_string()))?;

        let response = self.client.head(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProbeError::Timeout(self.timeout)
            } else {
                ProbeError::Transport(e.to_string())
            }
        })?;

        Ok(response.status().as_u16())
    }
}
