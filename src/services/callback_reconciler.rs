//! Out-of-order callback reconciliation.
//!
//! `external_id` is resolved against the slot keyspace first, then the
//! batch keyspace. A batch hit claims one pending slot atomically at the
//! storage layer, so two callbacks racing for the last pending slot produce
//! exactly one claim. Whatever cannot be linked goes to the audit trail and
//! is acknowledged without touching batch bookkeeping.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::error::CallbackError;
use crate::domain::models::{CallbackPayload, CallbackResolution};
use crate::domain::ports::{BatchRepository, CallbackRepository, SlotOutcome, SlotRepository};

/// Everything the ingestion route needs to answer the worker.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub resolution: CallbackResolution,
    /// Batch the resolved slot belongs to, when known.
    pub batch_id: Option<Uuid>,
    /// True only for the ingest call that transitioned the batch to
    /// `completed`.
    pub batch_completed: bool,
}

pub struct CallbackReconciler<S, B, C>
where
    S: SlotRepository,
    B: BatchRepository,
    C: CallbackRepository,
{
    slots: Arc<S>,
    batches: Arc<B>,
    callbacks: Arc<C>,
}

impl<S, B, C> CallbackReconciler<S, B, C>
where
    S: SlotRepository,
    B: BatchRepository,
    C: CallbackRepository,
{
    pub fn new(slots: Arc<S>, batches: Arc<B>, callbacks: Arc<C>) -> Self {
        Self { slots, batches, callbacks }
    }

    /// Resolve one inbound callback and apply its result. Safe to call any
    /// number of times with the same payload: duplicates against a terminal
    /// slot are no-ops and batch completion fires at most once.
    pub async fn ingest(&self, payload: &CallbackPayload) -> Result<IngestOutcome, CallbackError> {
        let outcome = slot_outcome(payload);

        let external_uuid = payload
            .external_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok());

        let Some(id) = external_uuid else {
            warn!(
                external_id = payload.external_id.as_deref().unwrap_or("-"),
                run_ref = %payload.run_ref,
                "callback carried no usable external id"
            );
            return self.record_unresolved(payload).await;
        };

        // Slot keyspace first: direct dispatch echoes the slot id back.
        if let Some(slot) = self.slots.get(id).await? {
            let applied = self.slots.apply_result(slot.id, &outcome).await?;
            if applied {
                info!(
                    slot_id = %slot.id,
                    batch_id = %slot.batch_id,
                    status = payload.status.as_str(),
                    "callback applied to slot"
                );
            } else {
                debug!(slot_id = %slot.id, "duplicate callback for terminal slot, ignoring");
            }
            let batch_completed = self.batches.try_complete(slot.batch_id).await?;
            if batch_completed {
                info!(batch_id = %slot.batch_id, "batch completed");
            }
            return Ok(IngestOutcome {
                resolution: CallbackResolution::DirectSlot { slot_id: slot.id },
                batch_id: Some(slot.batch_id),
                batch_completed,
            });
        }

        // Batch keyspace: claim one pending slot, or lose the race.
        if self.batches.get(id).await?.is_some() {
            match self.slots.claim_pending(id, &outcome).await? {
                Some(slot_id) => {
                    info!(
                        slot_id = %slot_id,
                        batch_id = %id,
                        status = payload.status.as_str(),
                        "callback claimed pending slot"
                    );
                    let batch_completed = self.batches.try_complete(id).await?;
                    if batch_completed {
                        info!(batch_id = %id, "batch completed");
                    }
                    return Ok(IngestOutcome {
                        resolution: CallbackResolution::ClaimedSlot { slot_id, batch_id: id },
                        batch_id: Some(id),
                        batch_completed,
                    });
                }
                None => {
                    warn!(batch_id = %id, run_ref = %payload.run_ref, "no pending slot left to claim");
                    return self.record_unresolved(payload).await;
                }
            }
        }

        warn!(external_id = %id, run_ref = %payload.run_ref, "callback matched neither keyspace");
        self.record_unresolved(payload).await
    }

    async fn record_unresolved(
        &self,
        payload: &CallbackPayload,
    ) -> Result<IngestOutcome, CallbackError> {
        let audit = self.callbacks.record_unlinked(payload).await?;
        debug!(audit_id = %audit.id, run_ref = %payload.run_ref, "unlinked callback recorded");
        Ok(IngestOutcome {
            resolution: CallbackResolution::Unresolved,
            batch_id: None,
            batch_completed: false,
        })
    }
}

fn slot_outcome(payload: &CallbackPayload) -> SlotOutcome {
    SlotOutcome {
        status: payload.status.slot_status(),
        score: payload.score,
        steps_taken: payload.steps_taken,
        run_ref: Some(payload.run_ref.clone()),
        error: payload.error.clone(),
        artifacts: payload.artifacts.clone(),
    }
}
