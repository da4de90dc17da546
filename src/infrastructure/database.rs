//! SQLite connection pool and migrations.

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

/// Opens (creating if missing) the SQLite database file `name`.
///
/// Foreign keys are enforced and the journal runs in WAL mode so readers do
/// not block the click writers.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub async fn connect(name: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(name)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database '{name}'"))?;

    tracing::info!(database = name, "Connected to database");
    Ok(pool)
}

/// Applies pending schema migrations from `./migrations`.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to apply migrations")?;

    tracing::info!("Database migrations applied");
    Ok(())
}
