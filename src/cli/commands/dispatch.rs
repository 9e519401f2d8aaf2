//! Implementation of the `swarmtest dispatch` command.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::commands::open_database;
use crate::cli::{output, CommandOutput};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::database::{BatchRepositoryImpl, SlotRepositoryImpl};
use crate::infrastructure::model::AnthropicModelClient;
use crate::infrastructure::runner::HttpRunnerClient;
use crate::services::{BatchDispatcher, DispatchOptions, GenerationOptions, PersonaGenerator};
use crate::domain::ports::RunnerClient;

#[derive(Args, Debug)]
pub struct DispatchArgs {
    /// Target audience description
    pub description: String,

    /// Target website URL the personas will test
    #[arg(short, long)]
    pub url: String,

    /// Number of personas to generate and dispatch
    #[arg(short, long)]
    pub count: Option<usize>,

    /// Step budget per dispatched run
    #[arg(long)]
    pub max_steps: Option<u32>,

    /// Skip the runner health probe before dispatching
    #[arg(long)]
    pub skip_health_check: bool,
}

#[derive(Debug, Serialize)]
pub struct DispatchOutput {
    pub batch_id: Uuid,
    pub dispatched: usize,
    pub rejected: usize,
    pub persona_names: Vec<String>,
}

impl CommandOutput for DispatchOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Batch {} created", self.batch_id),
            format!(
                "Dispatched {} slot(s), {} rejected",
                self.dispatched, self.rejected
            ),
        ];
        for name in &self.persona_names {
            lines.push(format!("  - {name}"));
        }
        lines.push("\nResults arrive via callbacks; check with `swarmtest status`.".to_string());
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: DispatchArgs, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let db = open_database(&config).await?;

    let model = Arc::new(AnthropicModelClient::new(&config.model)?);
    let runner = Arc::new(HttpRunnerClient::new(&config.runner)?);

    if !args.skip_health_check && !runner.health().await {
        bail!(
            "Runner at {} is not responding; use --skip-health-check to dispatch anyway",
            config.runner.base_url
        );
    }

    let generator = PersonaGenerator::new(model);
    let outcome = generator
        .generate_batch(
            &args.description,
            Some(&args.url),
            GenerationOptions {
                count: args.count.unwrap_or(config.generation.count),
                max_concurrency: config.generation.max_concurrency,
                example_persona: None,
                demographic_overrides: None,
            },
        )
        .await
        .context("Persona generation failed")?;

    let persona_names: Vec<String> = outcome.personas.iter().map(|p| p.name.clone()).collect();

    let slots = Arc::new(SlotRepositoryImpl::new(db.pool().clone()));
    let batches = Arc::new(BatchRepositoryImpl::new(db.pool().clone()));
    let dispatcher = BatchDispatcher::new(slots, batches, runner);

    let summary = dispatcher
        .dispatch(
            outcome.personas,
            &args.url,
            &args.description,
            &DispatchOptions {
                max_steps: args.max_steps.unwrap_or(config.runner.max_steps),
                callback_url: config.runner.callback_url.clone(),
                example_persona: None,
            },
        )
        .await
        .context("Batch dispatch failed")?;

    output(
        &DispatchOutput {
            batch_id: summary.batch_id,
            dispatched: summary.dispatched.len(),
            rejected: summary.rejected.len(),
            persona_names,
        },
        json_mode,
    );
    Ok(())
}
