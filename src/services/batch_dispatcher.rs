//! Batch creation and dispatch to the external execution service.
//!
//! Dispatch writes all persistence rows first, then sends. A runner
//! rejection fails only the rejected slot; siblings keep going. Completion
//! bookkeeping is owned entirely by the callback path.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::error::DispatchError;
use crate::domain::models::{BatchRun, Persona, TestSlot};
use crate::domain::ports::{BatchRepository, DispatchRequest, RunnerClient, SlotRepository};

/// Per-dispatch knobs beyond the personas themselves.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub max_steps: u32,
    pub callback_url: String,
    pub example_persona: Option<String>,
}

/// What happened to each slot at send time.
#[derive(Debug, Clone)]
pub struct DispatchSummary {
    pub batch_id: Uuid,
    pub dispatched: Vec<Uuid>,
    pub rejected: Vec<Uuid>,
}

impl DispatchSummary {
    pub fn total(&self) -> usize {
        self.dispatched.len() + self.rejected.len()
    }
}

pub struct BatchDispatcher<S, B, R>
where
    S: SlotRepository,
    B: BatchRepository,
    R: RunnerClient,
{
    slots: Arc<S>,
    batches: Arc<B>,
    runner: Arc<R>,
}

impl<S, B, R> BatchDispatcher<S, B, R>
where
    S: SlotRepository,
    B: BatchRepository,
    R: RunnerClient,
{
    pub fn new(slots: Arc<S>, batches: Arc<B>, runner: Arc<R>) -> Self {
        Self { slots, batches, runner }
    }

    /// Create a batch run with one pending slot per persona, persist
    /// everything, then send each slot to the runner. Returns the batch id
    /// and the per-slot send outcomes.
    pub async fn dispatch(
        &self,
        personas: Vec<Persona>,
        target_url: &str,
        user_description: &str,
        options: &DispatchOptions,
    ) -> Result<DispatchSummary, DispatchError> {
        if personas.is_empty() {
            return Err(DispatchError::EmptyBatch);
        }

        let batch = BatchRun::new(target_url, user_description);
        self.batches.insert(&batch).await?;

        let mut slots = Vec::with_capacity(personas.len());
        for persona in personas {
            let slot = TestSlot::new(batch.id, persona);
            self.slots.insert(&slot).await?;
            slots.push(slot);
        }

        // Rows exist before any network send, so every callback that arrives
        // has something to land on.
        self.batches.mark_running(batch.id).await?;
        info!(batch_id = %batch.id, slots = slots.len(), "batch persisted, dispatching");

        let total = slots.len() as u32;
        let mut summary = DispatchSummary {
            batch_id: batch.id,
            dispatched: Vec::new(),
            rejected: Vec::new(),
        };

        for slot in &slots {
            let request = DispatchRequest {
                total_personas: total,
                demographics: describe_persona(&slot.persona),
                general_intent: slot.persona.primary_goal.clone(),
                start_url: target_url.to_string(),
                max_steps: options.max_steps,
                example_persona: options.example_persona.clone(),
            };

            match self.runner.start_run(&request, slot.id, &options.callback_url).await {
                Ok(ack) => {
                    self.slots.record_dispatch(slot.id, ack.run_ref.as_deref()).await?;
                    info!(
                        slot_id = %slot.id,
                        persona = %slot.persona_name,
                        run_ref = ack.run_ref.as_deref().unwrap_or("-"),
                        "slot dispatched"
                    );
                    summary.dispatched.push(slot.id);
                }
                Err(err) => {
                    error!(slot_id = %slot.id, persona = %slot.persona_name, %err, "dispatch rejected");
                    self.slots.mark_failed(slot.id, &err.to_string()).await?;
                    summary.rejected.push(slot.id);
                }
            }
        }

        if summary.dispatched.is_empty() {
            warn!(batch_id = %batch.id, "every slot was rejected at dispatch");
        }

        Ok(summary)
    }
}

/// Session context line the worker shows in its own UI and logs.
fn describe_persona(persona: &Persona) -> String {
    format!(
        "{}, {} year old {} from {}; tech savviness {}, income {}",
        persona.name,
        persona.age,
        persona.occupation,
        persona.country,
        persona.tech_savviness.as_str(),
        persona.income_level.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_description_names_the_axes() {
        let persona = crate::domain::models::test_fixtures::persona("Ana Silva");
        let line = describe_persona(&persona);
        assert!(line.starts_with("Ana Silva, "));
        assert!(line.contains("tech savviness"));
        assert!(line.contains("income"));
    }

    #[test]
    fn summary_total_sums_both_outcomes() {
        let summary = DispatchSummary {
            batch_id: Uuid::new_v4(),
            dispatched: vec![Uuid::new_v4(), Uuid::new_v4()],
            rejected: vec![Uuid::new_v4()],
        };
        assert_eq!(summary.total(), 3);
    }
}
