//! CLI surface: clap types, command implementations, and output plumbing.

pub mod commands;

use clap::{Parser, Subcommand};

use commands::dispatch::DispatchArgs;
use commands::generate::GenerateArgs;
use commands::serve::ServeArgs;
use commands::status::StatusArgs;

#[derive(Parser)]
#[command(name = "swarmtest")]
#[command(about = "Persona-driven synthetic UX testing swarm", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a diverse persona pool from an audience description
    Generate(GenerateArgs),

    /// Generate personas and dispatch them as a test batch
    Dispatch(DispatchArgs),

    /// Run the callback ingestion server
    Serve(ServeArgs),

    /// Show the status of a batch run
    Status(StatusArgs),
}

/// Structured output rendered as text or JSON depending on the `--json` flag.
pub trait CommandOutput {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        println!("{}", result.to_human());
    }
}

pub fn handle_error(err: anyhow::Error, json_mode: bool) {
    if json_mode {
        eprintln!(
            "{}",
            serde_json::json!({ "success": false, "error": err.to_string() })
        );
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
