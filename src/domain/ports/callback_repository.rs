//! Repository port for the unlinked-callback audit trail.

use async_trait::async_trait;

use super::errors::DatabaseError;
use crate::domain::models::{CallbackPayload, UnlinkedCallback};

#[async_trait]
pub trait CallbackRepository: Send + Sync {
    /// Persist a callback that resolved to neither a slot nor a batch with
    /// pending capacity. The raw payload is kept verbatim for audit.
    async fn record_unlinked(
        &self,
        payload: &CallbackPayload,
    ) -> Result<UnlinkedCallback, DatabaseError>;

    /// List unlinked callbacks, newest first.
    async fn list_unlinked(&self, limit: i64) -> Result<Vec<UnlinkedCallback>, DatabaseError>;
}
