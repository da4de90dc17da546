//! Fixed pool of background workers persisting click events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::domain::click_event::ClickEvent;
use crate::domain::click_queue::ClickReceiver;
use crate::domain::repositories::ClickRepository;

/// Outcome of [`ClickWorkerPool::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Workers that drained the queue and exited on their own.
    pub finished: usize,
    /// Workers still running at the deadline and aborted.
    pub abandoned: usize,
}

/// Handle to the running click workers.
///
/// All workers share one [`ClickReceiver`] behind a mutex. A worker holds the
/// lock only while waiting for the next event; persistence happens after the
/// lock is released, so workers write concurrently.
pub struct ClickWorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl ClickWorkerPool {
    /// Spawns `worker_count` workers on the current tokio runtime.
    pub fn start<R>(receiver: ClickReceiver, repository: Arc<R>, worker_count: usize) -> Self
    where
        R: ClickRepository + 'static,
    {
        let receiver = Arc::new(Mutex::new(receiver));

        let handles = (0..worker_count)
            .map(|worker_id| {
                tokio::spawn(run_click_worker(
                    worker_id,
                    receiver.clone(),
                    repository.clone(),
                ))
            })
            .collect();

        tracing::info!(worker_count, "Click workers started");

        Self { handles }
    }

    /// Number of workers in the pool.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Waits for workers to drain the queue, giving up after `grace`.
    ///
    /// The queue must already be closed (every [`crate::domain::click_queue::ClickQueue`]
    /// dropped), otherwise workers keep waiting for events and are abandoned
    /// at the deadline.
    pub async fn shutdown(self, grace: Duration) -> ShutdownReport {
        let deadline = Instant::now() + grace;
        let mut report = ShutdownReport {
            finished: 0,
            abandoned: 0,
        };

        for mut handle in self.handles {
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(())) => report.finished += 1,
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Click worker terminated abnormally");
                    report.finished += 1;
                }
                Err(_) => {
                    handle.abort();
                    report.abandoned += 1;
                }
            }
        }

        if report.abandoned > 0 {
            tracing::warn!(
                abandoned = report.abandoned,
                grace_secs = grace.as_secs_f64(),
                "Click workers did not finish within the grace period"
            );
        } else {
            tracing::info!(finished = report.finished, "Click workers stopped");
        }

        report
    }
}

/// Consume loop of a single worker.
///
/// Exits when the queue is closed and drained. A failed write is logged and
/// the event is discarded.
async fn run_click_worker<R>(
    worker_id: usize,
    receiver: Arc<Mutex<ClickReceiver>>,
    repository: Arc<R>,
) where
    R: ClickRepository + ?Sized,
{
    tracing::debug!(worker_id, "Click worker running");

    loop {
        let next = { receiver.lock().await.recv().await };
        let Some(event) = next else {
            break;
        };

        persist_click(worker_id, repository.as_ref(), event).await;
    }

    tracing::debug!(worker_id, "Click queue closed, worker exiting");
}

async fn persist_click<R>(worker_id: usize, repository: &R, event: ClickEvent)
where
    R: ClickRepository + ?Sized,
{
    let link_id = event.link_id;
    let user_agent = event.user_agent.clone();
    let ip_address = event.ip_address.clone();

    match repository.create(event.into()).await {
        Ok(_) => {
            metrics::counter!("clicks_persisted_total").increment(1);
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            tracing::error!(
                worker_id,
                link_id,
                user_agent = %user_agent,
                ip_address = %ip_address,
                error = %e,
                "Failed to record click"
            );
        }
    }
}
