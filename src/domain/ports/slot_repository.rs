//! Repository port for test slot persistence.

use async_trait::async_trait;
use uuid::Uuid;

use super::errors::DatabaseError;
use crate::domain::models::{SlotStatus, TestSlot};

/// Terminal result to apply to a slot.
#[derive(Debug, Clone)]
pub struct SlotOutcome {
    pub status: SlotStatus,
    pub score: Option<f64>,
    pub steps_taken: Option<u32>,
    pub run_ref: Option<String>,
    pub error: Option<String>,
    pub artifacts: Option<serde_json::Value>,
}

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Insert a new slot (status `pending`).
    async fn insert(&self, slot: &TestSlot) -> Result<(), DatabaseError>;

    /// Get a slot by id.
    async fn get(&self, id: Uuid) -> Result<Option<TestSlot>, DatabaseError>;

    /// List all slots of a batch, oldest first.
    async fn list_by_batch(&self, batch_id: Uuid) -> Result<Vec<TestSlot>, DatabaseError>;

    /// Apply a terminal outcome to a specific slot. The update is conditional
    /// on the slot not already being terminal; returns `false` when the slot
    /// was already terminal (duplicate callback, safe no-op).
    async fn apply_result(&self, id: Uuid, outcome: &SlotOutcome) -> Result<bool, DatabaseError>;

    /// Atomically claim exactly one `pending` slot in the batch and apply the
    /// outcome to it, in a single conditional statement at the storage layer.
    /// Returns the claimed slot id, or `None` when no pending slot remains
    /// (including when a concurrent caller won the race).
    async fn claim_pending(
        &self,
        batch_id: Uuid,
        outcome: &SlotOutcome,
    ) -> Result<Option<Uuid>, DatabaseError>;

    /// Count slots of a batch still in `pending`.
    async fn count_pending(&self, batch_id: Uuid) -> Result<i64, DatabaseError>;

    /// Mark a slot failed at dispatch time (worker rejected the send).
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DatabaseError>;

    /// Record the worker session reference after a successful dispatch,
    /// leaving the status untouched.
    async fn record_dispatch(&self, id: Uuid, run_ref: Option<&str>) -> Result<(), DatabaseError>;
}
