//! Implementation of the `swarmtest status` command.

use anyhow::{bail, Result};
use clap::Args;
use uuid::Uuid;

use crate::cli::commands::open_database;
use crate::cli::{output, CommandOutput};
use crate::domain::ports::{BatchRepository, CallbackRepository, SlotRepository};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::database::{
    BatchRepositoryImpl, CallbackRepositoryImpl, SlotRepositoryImpl,
};
use crate::services::{summarize, BatchStatusReport};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Batch run ID
    pub batch_id: Uuid,

    /// Also list recent callbacks that could not be linked to any slot
    #[arg(long)]
    pub unlinked: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct StatusOutput {
    #[serde(flatten)]
    pub report: BatchStatusReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlinked: Option<Vec<crate::domain::models::UnlinkedCallback>>,
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut lines = vec![
            format!(
                "Batch {} [{}] - {}",
                report.batch.id,
                report.batch.status.as_str(),
                report.batch.target_url
            ),
            format!(
                "Slots: {} total | {} pending, {} running, {} completed, {} failed",
                report.counts.total(),
                report.counts.pending,
                report.counts.running,
                report.counts.completed,
                report.counts.failed
            ),
        ];
        if let Some(avg) = report.average_score {
            lines.push(format!("Average score: {avg:.1}"));
        }
        lines.push(String::new());
        for slot in &report.slots {
            let score = slot
                .score
                .map(|s| format!("{s:.1}"))
                .unwrap_or_else(|| "-".to_string());
            lines.push(format!(
                "  {} [{}] {} (score {})",
                slot.id,
                slot.status.as_str(),
                slot.persona_name,
                score
            ));
            if let Some(err) = &slot.error_message {
                lines.push(format!("      error: {err}"));
            }
        }
        if let Some(unlinked) = &self.unlinked {
            lines.push(format!("\nUnlinked callbacks ({}):", unlinked.len()));
            for entry in unlinked {
                lines.push(format!(
                    "  {} external_id={} status={}",
                    entry.received_at.to_rfc3339(),
                    entry.external_id.as_deref().unwrap_or("-"),
                    entry.status.as_str()
                ));
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: StatusArgs, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let db = open_database(&config).await?;

    let batches = BatchRepositoryImpl::new(db.pool().clone());
    let slots = SlotRepositoryImpl::new(db.pool().clone());

    let Some(batch) = batches.get(args.batch_id).await? else {
        bail!("Batch {} not found", args.batch_id);
    };
    let batch_slots = slots.list_by_batch(args.batch_id).await?;

    let unlinked = if args.unlinked {
        let callbacks = CallbackRepositoryImpl::new(db.pool().clone());
        Some(callbacks.list_unlinked(50).await?)
    } else {
        None
    };

    output(
        &StatusOutput { report: summarize(batch, batch_slots), unlinked },
        json_mode,
    );
    Ok(())
}
