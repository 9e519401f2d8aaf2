use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::models::{BatchRun, BatchStatus};
use crate::domain::ports::batch_repository::BatchRepository;
use crate::domain::ports::DatabaseError;
use crate::infrastructure::database::utils::parse_datetime;

/// SQLite implementation of [`BatchRepository`].
pub struct BatchRepositoryImpl {
    pool: SqlitePool,
}

impl BatchRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_batch(&self, row: &sqlx::sqlite::SqliteRow) -> Result<BatchRun, DatabaseError> {
        let status_raw: String = row.get("status");
        let status = BatchStatus::from_str(&status_raw)
            .ok_or_else(|| DatabaseError::InvalidValue(format!("batch status '{status_raw}'")))?;

        Ok(BatchRun {
            id: Uuid::parse_str(row.get::<String, _>("id").as_str())?,
            target_url: row.get("target_url"),
            user_description: row.get("user_description"),
            status,
            error_message: row.get("error_message"),
            created_at: parse_datetime(row.get::<String, _>("created_at").as_str())?,
            completed_at: row
                .get::<Option<String>, _>("completed_at")
                .as_ref()
                .and_then(|s| parse_datetime(s).ok()),
        })
    }
}

#[async_trait]
impl BatchRepository for BatchRepositoryImpl {
    async fn insert(&self, batch: &BatchRun) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO batch_runs \
             (id, target_url, user_description, status, error_message, created_at, completed_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(batch.id.to_string())
        .bind(&batch.target_url)
        .bind(&batch.user_description)
        .bind(batch.status.as_str())
        .bind(&batch.error_message)
        .bind(batch.created_at.to_rfc3339())
        .bind(batch.completed_at.map(|dt| dt.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<BatchRun>, DatabaseError> {
        let row = sqlx::query("SELECT * FROM batch_runs WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(|r| self.row_to_batch(r)).transpose()
    }

    async fn mark_running(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE batch_runs SET status = 'running' WHERE id = ? AND status = 'pending'")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn try_complete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        // One conditional statement: checking for pending slots and flipping
        // the status are not separable, so concurrent completion checks
        // produce exactly one transition.
        let result = sqlx::query(
            "UPDATE batch_runs \
             SET status = 'completed', completed_at = ?1 \
             WHERE id = ?2 \
               AND status != 'completed' \
               AND NOT EXISTS (SELECT 1 FROM test_slots \
                               WHERE batch_id = ?2 AND status = 'pending')",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
