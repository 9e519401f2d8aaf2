//! Read-side aggregation of a batch and its slots.

use serde::Serialize;

use crate::domain::models::{BatchRun, SlotStatus, TestSlot};

/// Per-status slot counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SlotCounts {
    pub pending: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
}

impl SlotCounts {
    pub fn total(&self) -> usize {
        self.pending + self.running + self.completed + self.failed
    }
}

/// Snapshot of a batch for status output.
#[derive(Debug, Clone, Serialize)]
pub struct BatchStatusReport {
    pub batch: BatchRun,
    pub counts: SlotCounts,
    pub average_score: Option<f64>,
    pub slots: Vec<TestSlot>,
}

/// Build a status report from a batch and its slots. Average score covers
/// completed slots only.
pub fn summarize(batch: BatchRun, slots: Vec<TestSlot>) -> BatchStatusReport {
    let mut counts = SlotCounts::default();
    let mut score_sum = 0.0;
    let mut scored = 0usize;

    for slot in &slots {
        match slot.status {
            SlotStatus::Pending => counts.pending += 1,
            SlotStatus::Running => counts.running += 1,
            SlotStatus::Completed => {
                counts.completed += 1;
                if let Some(score) = slot.score {
                    score_sum += score;
                    scored += 1;
                }
            }
            SlotStatus::Failed => counts.failed += 1,
        }
    }

    let average_score = (scored > 0).then(|| score_sum / scored as f64);

    BatchStatusReport { batch, counts, average_score, slots }
}
