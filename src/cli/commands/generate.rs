//! Implementation of the `swarmtest generate` command.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::{output, CommandOutput};
use crate::domain::models::Persona;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::model::AnthropicModelClient;
use crate::services::{select_top_personas, GenerationOptions, PersonaGenerator};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Target audience description
    pub description: String,

    /// Target website URL, included as generation context
    #[arg(short, long)]
    pub url: Option<String>,

    /// Number of personas to generate
    #[arg(short, long)]
    pub count: Option<usize>,

    /// Keep only the N most relevant personas
    #[arg(short, long)]
    pub select: Option<usize>,

    /// Free-text example persona used to seed the prompt
    #[arg(long)]
    pub example: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub personas: Vec<Persona>,
    pub reasoning: String,
}

impl CommandOutput for GenerateOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Generated {} persona(s):\n", self.personas.len())];
        for persona in &self.personas {
            lines.push(format!(
                "  {} ({}, {}) - relevance {:.1}",
                persona.name, persona.age, persona.country, persona.relevance_score
            ));
            lines.push(format!("    Goal: {}", persona.primary_goal));
        }
        lines.push(format!("\n{}", self.reasoning));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: GenerateArgs, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load()?;

    let model = Arc::new(AnthropicModelClient::new(&config.model)?);
    let generator = PersonaGenerator::new(model);

    let options = GenerationOptions {
        count: args.count.unwrap_or(config.generation.count),
        max_concurrency: config.generation.max_concurrency,
        example_persona: args.example,
        demographic_overrides: None,
    };

    let outcome = generator
        .generate_batch(&args.description, args.url.as_deref(), options)
        .await
        .context("Persona generation failed")?;

    let (personas, reasoning) = match args.select {
        Some(n) => {
            let selection = select_top_personas(&outcome.personas, n)?;
            let personas: Vec<Persona> = selection
                .selected_indices
                .iter()
                .map(|&i| outcome.personas[i].clone())
                .collect();
            (personas, format!("{} {}", outcome.reasoning, selection.reasoning))
        }
        None => (outcome.personas, outcome.reasoning),
    };

    output(&GenerateOutput { personas, reasoning }, json_mode);
    Ok(())
}
