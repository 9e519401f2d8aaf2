//! Batch run and test slot domain models.
//!
//! A batch is a set of slots dispatched together against one target and
//! audience description. A slot transitions out of `pending` exactly once
//! and is never resurrected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::persona::Persona;

/// Status of one test slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// Slot is created and dispatched; awaiting a result callback
    Pending,
    /// A callback claimed the slot and processing is in flight
    Running,
    /// Terminal: the external worker reported success
    Completed,
    /// Terminal: dispatch was rejected or the worker reported failure
    Failed,
}

impl Default for SlotStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" | "complete" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Status of a batch run. `Completed` holds iff zero slots remain pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl Default for BatchStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" | "complete" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One logical persona-driven test execution unit within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSlot {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub status: SlotStatus,
    pub persona: Persona,
    pub persona_name: String,
    /// Identifier of the external worker session, once known.
    pub external_session_ref: Option<String>,
    pub score: Option<f64>,
    /// Steps the worker spent before finishing, as reported in its callback.
    pub steps_taken: Option<u32>,
    /// Opaque result artifacts from the worker (traces, screenshot refs).
    pub artifacts: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TestSlot {
    pub fn new(batch_id: Uuid, persona: Persona) -> Self {
        let persona_name = persona.name.clone();
        Self {
            id: Uuid::new_v4(),
            batch_id,
            status: SlotStatus::Pending,
            persona,
            persona_name,
            external_session_ref: None,
            score: None,
            steps_taken: None,
            artifacts: None,
            error_message: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// A set of slots dispatched together against one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRun {
    pub id: Uuid,
    pub target_url: String,
    pub user_description: String,
    pub status: BatchStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BatchRun {
    pub fn new(target_url: impl Into<String>, user_description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            target_url: target_url.into(),
            user_description: user_description.into(),
            status: BatchStatus::Pending,
            error_message: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_status_round_trips() {
        for status in [
            SlotStatus::Pending,
            SlotStatus::Running,
            SlotStatus::Completed,
            SlotStatus::Failed,
        ] {
            assert_eq!(SlotStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(SlotStatus::from_str("terminated"), None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(SlotStatus::Completed.is_terminal());
        assert!(SlotStatus::Failed.is_terminal());
        assert!(!SlotStatus::Pending.is_terminal());
        assert!(!SlotStatus::Running.is_terminal());
    }

    #[test]
    fn new_slot_starts_pending() {
        let persona = crate::domain::models::test_fixtures::persona("Ana Silva");
        let batch_id = Uuid::new_v4();
        let slot = TestSlot::new(batch_id, persona);
        assert_eq!(slot.status, SlotStatus::Pending);
        assert_eq!(slot.batch_id, batch_id);
        assert_eq!(slot.persona_name, "Ana Silva");
        assert!(slot.completed_at.is_none());
    }
}
