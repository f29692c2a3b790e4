use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::models::{QueuedOperation, SyncKind, SyncOperation};
use crate::repository::QueueRepository;

/// Hard cap on queued operations; oldest entries are evicted beyond it.
/// Replication is best-effort, so this is an acceptable loss policy.
const QUEUE_CAP: i64 = 1000;

/// SQLite-backed sync queue. FIFO by rowid; the operation kind is stored
/// as a JSON column, attempts and the enqueue time as flat columns.
pub struct SqliteQueueRepository {
    pool: SqlitePool,
}

impl SqliteQueueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueRepository for SqliteQueueRepository {
    async fn enqueue(&self, op: &SyncOperation) -> Result<()> {
        let kind = serde_json::to_string(&op.kind).context("Failed to serialize operation")?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO sync_queue (op, attempts, enqueued_at) VALUES (?, ?, ?)")
            .bind(&kind)
            .bind(op.attempts as i64)
            .bind(op.enqueued_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .context("Failed to enqueue operation")?;

        let evicted = sqlx::query(
            "DELETE FROM sync_queue WHERE id NOT IN \
             (SELECT id FROM sync_queue ORDER BY id DESC LIMIT ?)",
        )
        .bind(QUEUE_CAP)
        .execute(&mut *tx)
        .await
        .context("Failed to enforce queue cap")?;

        tx.commit().await?;

        if evicted.rows_affected() > 0 {
            log::warn!(
                "[QUEUE] evicted {} oldest operation(s) past the {} entry cap",
                evicted.rows_affected(),
                QUEUE_CAP
            );
        }
        Ok(())
    }

    async fn front(&self, limit: usize) -> Result<Vec<QueuedOperation>> {
        let rows = sqlx::query(
            "SELECT id, op, attempts, enqueued_at FROM sync_queue ORDER BY id ASC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to read queue head")?;

        rows.iter()
            .map(|row| {
                let op_json: String = row.get("op");
                let kind: SyncKind = serde_json::from_str(&op_json)
                    .context("Failed to deserialize queued operation")?;
                let enqueued_at: String = row.get("enqueued_at");
                Ok(QueuedOperation {
                    id: row.get("id"),
                    op: SyncOperation {
                        kind,
                        attempts: row.get::<i64, _>("attempts") as u32,
                        enqueued_at: DateTime::parse_from_rfc3339(&enqueued_at)
                            .map(|dt| dt.with_timezone(&Utc))
                            .unwrap_or_else(|_| Utc::now()),
                    },
                })
            })
            .collect()
    }

    async fn remove(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM sync_queue WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to remove queued operation")?;
        Ok(())
    }

    async fn bump_attempts(&self, id: i64) -> Result<u32> {
        let attempts: i64 = sqlx::query_scalar(
            "UPDATE sync_queue SET attempts = attempts + 1 WHERE id = ? RETURNING attempts",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to bump operation attempts")?;

        Ok(attempts as u32)
    }

    async fn len(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sync_queue")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count queue")?;
        Ok(count as usize)
    }
}
