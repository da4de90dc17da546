//! SQLite implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    timestamp: DateTime<Utc>,
    user_agent: String,
    ip_address: String,
}

/// SQLite repository for click persistence.
pub struct SqliteClickRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for SqliteClickRepository {
    async fn create(&self, new_click: NewClick) -> Result<Click, AppError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO clicks (link_id, timestamp, user_agent, ip_address)
            VALUES (?, ?, ?, ?)
            RETURNING id, link_id, timestamp, user_agent, ip_address
            "#,
        )
        .bind(new_click.link_id)
        .bind(new_click.timestamp)
        .bind(&new_click.user_agent)
        .bind(&new_click.ip_address)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Click::new(
            row.id,
            row.link_id,
            row.timestamp,
            row.user_agent,
            row.ip_address,
        ))
    }
}
