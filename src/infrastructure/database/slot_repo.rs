use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::models::{SlotStatus, TestSlot};
use crate::domain::ports::slot_repository::{SlotOutcome, SlotRepository};
use crate::domain::ports::DatabaseError;
use crate::infrastructure::database::utils::parse_datetime;

/// SQLite implementation of [`SlotRepository`].
pub struct SlotRepositoryImpl {
    pool: SqlitePool,
}

impl SlotRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_slot(&self, row: &sqlx::sqlite::SqliteRow) -> Result<TestSlot, DatabaseError> {
        let status_raw: String = row.get("status");
        let status = SlotStatus::from_str(&status_raw)
            .ok_or_else(|| DatabaseError::InvalidValue(format!("slot status '{status_raw}'")))?;

        Ok(TestSlot {
            id: Uuid::parse_str(row.get::<String, _>("id").as_str())?,
            batch_id: Uuid::parse_str(row.get::<String, _>("batch_id").as_str())?,
            status,
            persona: serde_json::from_str(row.get::<String, _>("persona").as_str())?,
            persona_name: row.get("persona_name"),
            external_session_ref: row.get("external_session_ref"),
            score: row.get("score"),
            steps_taken: row
                .get::<Option<i64>, _>("steps_taken")
                .map(|v| v as u32),
            artifacts: row
                .get::<Option<String>, _>("artifacts")
                .as_ref()
                .and_then(|s| serde_json::from_str(s).ok()),
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
impl SlotRepository for SlotRepositoryImpl {
    async fn insert(&self, slot: &TestSlot) -> Result<(), DatabaseError> {
        let persona = serde_json::to_string(&slot.persona)?;
        let artifacts = slot
            .artifacts
            .as_ref()
            .and_then(|v| serde_json::to_string(v).ok());

        sqlx::query(
            "INSERT INTO test_slots \
             (id, batch_id, status, persona, persona_name, external_session_ref, \
              score, steps_taken, artifacts, error_message, created_at, completed_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(slot.id.to_string())
        .bind(slot.batch_id.to_string())
        .bind(slot.status.as_str())
        .bind(persona)
        .bind(&slot.persona_name)
        .bind(&slot.external_session_ref)
        .bind(slot.score)
        .bind(slot.steps_taken.map(i64::from))
        .bind(artifacts)
        .bind(&slot.error_message)
        .bind(slot.created_at.to_rfc3339())
        .bind(slot.completed_at.map(|dt| dt.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<TestSlot>, DatabaseError> {
        let row = sqlx::query("SELECT * FROM test_slots WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(|r| self.row_to_slot(r)).transpose()
    }

    async fn list_by_batch(&self, batch_id: Uuid) -> Result<Vec<TestSlot>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM test_slots WHERE batch_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(batch_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|r| self.row_to_slot(r)).collect()
    }

    async fn apply_result(&self, id: Uuid, outcome: &SlotOutcome) -> Result<bool, DatabaseError> {
        let artifacts = outcome
            .artifacts
            .as_ref()
            .and_then(|v| serde_json::to_string(v).ok());

        // Conditional on the slot not already being terminal, so duplicate
        // callbacks are safe no-ops.
        let result = sqlx::query(
            "UPDATE test_slots \
             SET status = ?, \
                 score = ?, \
                 steps_taken = ?, \
                 external_session_ref = COALESCE(?, external_session_ref), \
                 error_message = ?, \
                 artifacts = ?, \
                 completed_at = ? \
             WHERE id = ? AND status IN ('pending', 'running')",
        )
        .bind(outcome.status.as_str())
        .bind(outcome.score)
        .bind(outcome.steps_taken.map(i64::from))
        .bind(&outcome.run_ref)
        .bind(&outcome.error)
        .bind(artifacts)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn claim_pending(
        &self,
        batch_id: Uuid,
        outcome: &SlotOutcome,
    ) -> Result<Option<Uuid>, DatabaseError> {
        let artifacts = outcome
            .artifacts
            .as_ref()
            .and_then(|v| serde_json::to_string(v).ok());

        // Single statement: selecting the oldest pending slot and updating it
        // are not separable, so two concurrent claims for the last pending
        // slot cannot both win.
        let row = sqlx::query(
            "UPDATE test_slots \
             SET status = ?1, \
                 score = ?2, \
                 steps_taken = ?3, \
                 external_session_ref = COALESCE(?4, external_session_ref), \
                 error_message = ?5, \
                 artifacts = ?6, \
                 completed_at = ?7 \
             WHERE id IN (SELECT id FROM test_slots \
                          WHERE batch_id = ?8 AND status = 'pending' \
                          ORDER BY created_at ASC, id ASC LIMIT 1) \
               AND status = 'pending' \
             RETURNING id",
        )
        .bind(outcome.status.as_str())
        .bind(outcome.score)
        .bind(outcome.steps_taken.map(i64::from))
        .bind(&outcome.run_ref)
        .bind(&outcome.error)
        .bind(artifacts)
        .bind(Utc::now().to_rfc3339())
        .bind(batch_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Ok(Uuid::parse_str(r.get::<String, _>("id").as_str())?))
            .transpose()
    }

    async fn count_pending(&self, batch_id: Uuid) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM test_slots WHERE batch_id = ? AND status = 'pending'",
        )
        .bind(batch_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE test_slots \
             SET status = 'failed', error_message = ?, completed_at = ? \
             WHERE id = ? AND status IN ('pending', 'running')",
        )
        .bind(error)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_dispatch(&self, id: Uuid, run_ref: Option<&str>) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE test_slots \
             SET external_session_ref = COALESCE(?, external_session_ref) \
             WHERE id = ?",
        )
        .bind(run_ref)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
