//! Port for the external browser-automation execution service.
//!
//! Dispatch is fire-and-forget: the runner acknowledges receipt and later
//! posts results to the callback address out of band. Acknowledgment and
//! completion are distinct failure domains.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::RunnerError;

/// Session context sent with each dispatched slot.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRequest {
    pub total_personas: u32,
    /// Human-readable demographics summary for the worker's session context.
    pub demographics: String,
    pub general_intent: String,
    pub start_url: String,
    pub max_steps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_persona: Option<String>,
}

/// Acknowledgment of receipt. Completion arrives later via callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DispatchAck {
    /// Worker-side run identifier, when the runner assigns one up front.
    pub run_ref: Option<String>,
}

#[async_trait]
pub trait RunnerClient: Send + Sync {
    /// Start one run for the given slot. `slot_id` and `callback_url` are the
    /// identity the worker echoes back when posting results. Success means
    /// the runner accepted the work, nothing more.
    async fn start_run(
        &self,
        request: &DispatchRequest,
        slot_id: Uuid,
        callback_url: &str,
    ) -> Result<DispatchAck, RunnerError>;

    /// Best-effort liveness probe.
    async fn health(&self) -> bool;
}
