//! Periodic reachability monitoring of link destinations.
//!
//! Every tick the monitor probes each stored `long_url` and keeps the last
//! observed state per link in memory. A change notification is logged only
//! when a link that has been seen before changes state.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::domain::entities::Link;
use crate::domain::probe::UrlProbe;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Reachability of a link destination.
///
/// Links never probed are `Unknown`; a probe moves them to one of the other
/// two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkHealth {
    Unknown,
    Accessible,
    Inaccessible,
}

impl LinkHealth {
    /// Classifies a probe outcome. Any 2xx or 3xx status is accessible.
    pub fn from_probe<E>(result: &Result<u16, E>) -> Self {
        match result {
            Ok(status) if (200..400).contains(status) => LinkHealth::Accessible,
            _ => LinkHealth::Inaccessible,
        }
    }
}

impl fmt::Display for LinkHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkHealth::Unknown => "UNKNOWN",
            LinkHealth::Accessible => "ACCESSIBLE",
            LinkHealth::Inaccessible => "INACCESSIBLE",
        };
        f.write_str(s)
    }
}

/// A state transition observed on a link that had a previous state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub link_id: i64,
    pub short_code: String,
    pub long_url: String,
    pub from: LinkHealth,
    pub to: LinkHealth,
}

/// Polls every link destination on a fixed interval.
pub struct HealthMonitor<L: LinkRepository, P: UrlProbe> {
    link_repository: Arc<L>,
    probe: Arc<P>,
    interval: Duration,
    known_states: Mutex<HashMap<i64, LinkHealth>>,
}

impl<L: LinkRepository, P: UrlProbe> HealthMonitor<L, P> {
    pub fn new(link_repository: Arc<L>, probe: Arc<P>, interval: Duration) -> Self {
        Self {
            link_repository,
            probe,
            interval,
            known_states: Mutex::new(HashMap::new()),
        }
    }

    /// Last observed state of a link.
    pub fn state_of(&self, link_id: i64) -> LinkHealth {
        self.known_states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&link_id)
            .copied()
            .unwrap_or(LinkHealth::Unknown)
    }

    /// Runs the polling loop until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// The first check runs immediately.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Starting URL health monitor"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.check_links().await {
                        tracing::error!(error = %e, "Failed to retrieve links for monitoring, skipping tick");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("URL health monitor stopped");
    }

    /// Probes every link once and returns the observed state changes.
    ///
    /// # Errors
    ///
    /// Returns the repository error if the link list cannot be loaded. Probe
    /// failures are not errors; they classify the link as inaccessible.
    pub async fn check_links(&self) -> Result<Vec<StateChange>, AppError> {
        tracing::debug!("Starting URL status verification");

        let links = self.link_repository.find_all().await?;
        let mut changes = Vec::new();

        for link in links {
            if let Some(change) = self.check_link(&link).await {
                changes.push(change);
            }
        }

        tracing::debug!(changes = changes.len(), "URL status verification completed");
        Ok(changes)
    }

    async fn check_link(&self, link: &Link) -> Option<StateChange> {
        let result = self.probe.probe(&link.long_url).await;
        if let Err(e) = &result {
            tracing::debug!(short_code = %link.short_code, url = %link.long_url, error = %e, "Probe failed");
        }
        let current = LinkHealth::from_probe(&result);

        let previous = self.record(link.id, current);

        match previous {
            None => {
                tracing::info!(
                    short_code = %link.short_code,
                    url = %link.long_url,
                    state = %current,
                    "Initial state recorded"
                );
                None
            }
            Some(previous) if previous != current => {
                tracing::warn!(
                    short_code = %link.short_code,
                    url = %link.long_url,
                    from = %previous,
                    to = %current,
                    "Link state changed"
                );
                Some(StateChange {
                    link_id: link.id,
                    short_code: link.short_code.clone(),
                    long_url: link.long_url.clone(),
                    from: previous,
                    to: current,
                })
            }
            Some(_) => None,
        }
    }

    /// Stores `current` and returns the state it replaced.
    fn record(&self, link_id: i64, current: LinkHealth) -> Option<LinkHealth> {
        self.known_states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(link_id, current)
    }
}
