//! Repository port for batch run persistence.

use async_trait::async_trait;
use uuid::Uuid;

use super::errors::DatabaseError;
use crate::domain::models::BatchRun;

#[async_trait]
pub trait BatchRepository: Send + Sync {
    /// Insert a new batch run.
    async fn insert(&self, batch: &BatchRun) -> Result<(), DatabaseError>;

    /// Get a batch run by id.
    async fn get(&self, id: Uuid) -> Result<Option<BatchRun>, DatabaseError>;

    /// Transition the batch to `running` once slots are dispatched.
    async fn mark_running(&self, id: Uuid) -> Result<(), DatabaseError>;

    /// Transition the batch to `completed` iff it exists, is not already
    /// completed, and has zero pending slots. Must execute as one conditional
    /// statement so concurrent completion checks are safe no-ops. Returns
    /// `true` only for the call that performed the transition.
    async fn try_complete(&self, id: Uuid) -> Result<bool, DatabaseError>;
}
