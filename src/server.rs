//! HTTP server initialization and runtime setup.
//!
//! Handles database setup, the click worker pool, the health monitor and the
//! Axum server lifecycle including graceful shutdown.

use crate::application::services::HealthMonitor;
use crate::config::Config;
use crate::domain::click_queue::ClickQueue;
use crate::domain::click_worker::ClickWorkerPool;
use crate::infrastructure::database;
use crate::infrastructure::persistence::{SqliteClickRepository, SqliteLinkRepository};
use crate::infrastructure::probe::HttpProbe;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Time click workers get to drain the queue after the server stops.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool
/// - Apply migrations
/// - Click queue and worker pool
/// - URL health monitor
/// - Axum HTTP server
///
/// On Ctrl-C or SIGTERM the server stops accepting connections and finishes
/// in-flight requests. Dropping the router then closes the click queue, the
/// monitor is signalled to stop, and workers get [`SHUTDOWN_GRACE`] to drain
/// the remaining clicks.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = database::connect(&config.database.name).await?;
    database::run_migrations(&pool).await?;
    let pool = Arc::new(pool);

    let (click_queue, click_receiver) = ClickQueue::new(config.analytics.buffer_size);
    let click_repository = Arc::new(SqliteClickRepository::new(pool.clone()));
    let workers = ClickWorkerPool::start(
        click_receiver,
        click_repository,
        config.analytics.worker_count,
    );

    let probe = Arc::new(HttpProbe::new().context("Failed to build HTTP client")?);
    let monitor = HealthMonitor::new(
        Arc::new(SqliteLinkRepository::new(pool.clone())),
        probe,
        config.monitor_interval(),
    );
    let (monitor_tx, monitor_rx) = watch::channel(false);
    let mut monitor_task = tokio::spawn(async move { monitor.run(monitor_rx).await });

    let state = AppState::new(pool, &config.server.base_url, click_queue);
    let app = app_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    let served = axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    tracing::info!("HTTP server stopped, shutting down background tasks");

    // A pass in progress finishes before the monitor sees the signal.
    let _ = monitor_tx.send(true);
    match tokio::time::timeout(SHUTDOWN_GRACE, &mut monitor_task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Health monitor task failed"),
        Err(_) => {
            monitor_task.abort();
            tracing::warn!("Health monitor did not stop in time, aborted");
        }
    }

    let report = workers.shutdown(SHUTDOWN_GRACE).await;
    tracing::info!(
        finished = report.finished,
        abandoned = report.abandoned,
        "Shutdown complete"
    );

    served.context("Server error")
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
