//! Callback payload and resolution types.
//!
//! `external_id` is ambiguous by design: the external worker echoes back
//! either a slot id (direct dispatch) or a batch id (batched dispatch).
//! Resolution is an explicit sum type rather than lookup-miss control flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::batch::SlotStatus;

/// Result status reported by the external worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackStatus {
    Running,
    Completed,
    Failed,
    Terminated,
}

impl CallbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Terminated => "terminated",
        }
    }

    /// Terminal slot status this callback maps to. Anything other than a
    /// clean completion fails the slot.
    pub fn slot_status(&self) -> SlotStatus {
        match self {
            Self::Completed => SlotStatus::Completed,
            Self::Running | Self::Failed | Self::Terminated => SlotStatus::Failed,
        }
    }
}

/// An inbound result from the external worker. Arrives asynchronously,
/// at-least-once, unordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    /// A TestSlot id or a BatchRun id; may also be absent or garbage.
    pub external_id: Option<String>,
    /// Worker-side run identifier.
    pub run_ref: String,
    pub status: CallbackStatus,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub steps_taken: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
    /// Opaque result artifacts (traces, screenshot refs) passed through.
    #[serde(default)]
    pub artifacts: Option<serde_json::Value>,
}

/// How a callback was mapped onto a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallbackResolution {
    /// `external_id` named a slot directly.
    DirectSlot { slot_id: Uuid },
    /// `external_id` named a batch; one pending slot was atomically claimed.
    ClaimedSlot { slot_id: Uuid, batch_id: Uuid },
    /// Neither keyspace resolved (or the race for the last pending slot was
    /// lost). Payload is retained for audit.
    Unresolved,
}

impl CallbackResolution {
    pub fn slot_id(&self) -> Option<Uuid> {
        match self {
            Self::DirectSlot { slot_id } | Self::ClaimedSlot { slot_id, .. } => Some(*slot_id),
            Self::Unresolved => None,
        }
    }
}

/// Audit row for a callback that could not be linked to any slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlinkedCallback {
    pub id: Uuid,
    pub external_id: Option<String>,
    pub run_ref: String,
    pub status: CallbackStatus,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_maps_to_completed() {
        assert_eq!(CallbackStatus::Completed.slot_status(), SlotStatus::Completed);
        assert_eq!(CallbackStatus::Failed.slot_status(), SlotStatus::Failed);
        assert_eq!(CallbackStatus::Terminated.slot_status(), SlotStatus::Failed);
        assert_eq!(CallbackStatus::Running.slot_status(), SlotStatus::Failed);
    }

    #[test]
    fn payload_tolerates_missing_optionals() {
        let payload: CallbackPayload = serde_json::from_value(serde_json::json!({
            "externalId": "not-a-uuid",
            "runRef": "run-42",
            "status": "completed"
        }))
        .unwrap();
        assert_eq!(payload.status, CallbackStatus::Completed);
        assert!(payload.score.is_none());
        assert!(payload.artifacts.is_none());
    }

    #[test]
    fn resolution_slot_id() {
        let slot = Uuid::new_v4();
        let batch = Uuid::new_v4();
        assert_eq!(CallbackResolution::DirectSlot { slot_id: slot }.slot_id(), Some(slot));
        assert_eq!(
            CallbackResolution::ClaimedSlot { slot_id: slot, batch_id: batch }.slot_id(),
            Some(slot)
        );
        assert_eq!(CallbackResolution::Unresolved.slot_id(), None);
    }
}
