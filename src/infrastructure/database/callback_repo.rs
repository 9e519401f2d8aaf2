use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::models::{CallbackPayload, CallbackStatus, UnlinkedCallback};
use crate::domain::ports::callback_repository::CallbackRepository;
use crate::domain::ports::DatabaseError;
use crate::infrastructure::database::utils::parse_datetime;

/// SQLite implementation of [`CallbackRepository`].
pub struct CallbackRepositoryImpl {
    pool: SqlitePool,
}

impl CallbackRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_callback(
        &self,
        row: &sqlx::sqlite::SqliteRow,
    ) -> Result<UnlinkedCallback, DatabaseError> {
        let status_raw: String = row.get("status");
        let status: CallbackStatus = serde_json::from_value(serde_json::Value::String(
            status_raw.clone(),
        ))
        .map_err(|_| DatabaseError::InvalidValue(format!("callback status '{status_raw}'")))?;

        Ok(UnlinkedCallback {
            id: Uuid::parse_str(row.get::<String, _>("id").as_str())?,
            external_id: row.get("external_id"),
            run_ref: row.get::<Option<String>, _>("run_ref").unwrap_or_default(),
            status,
            payload: serde_json::from_str(row.get::<String, _>("payload").as_str())?,
            received_at: parse_datetime(row.get::<String, _>("received_at").as_str())?,
        })
    }
}

#[async_trait]
impl CallbackRepository for CallbackRepositoryImpl {
    async fn record_unlinked(
        &self,
        payload: &CallbackPayload,
    ) -> Result<UnlinkedCallback, DatabaseError> {
        let entry = UnlinkedCallback {
            id: Uuid::new_v4(),
            external_id: payload.external_id.clone(),
            run_ref: payload.run_ref.clone(),
            status: payload.status,
            payload: serde_json::to_value(payload)?,
            received_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO unlinked_callbacks \
             (id, external_id, run_ref, status, payload, received_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.id.to_string())
        .bind(&entry.external_id)
        .bind(&entry.run_ref)
        .bind(entry.status.as_str())
        .bind(serde_json::to_string(&entry.payload)?)
        .bind(entry.received_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn list_unlinked(&self, limit: i64) -> Result<Vec<UnlinkedCallback>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM unlinked_callbacks ORDER BY received_at DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|r| self.row_to_callback(r)).collect()
    }
}
