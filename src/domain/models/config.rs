//! Application configuration model.
//!
//! Loaded via the figment-based loader in `infrastructure::config`, merged
//! from defaults, a YAML file, and `SWARMTEST_`-prefixed environment
//! variables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub model: ModelConfig,
    pub runner: RunnerConfig,
    pub server: ServerConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database path (e.g. ".swarmtest/swarmtest.db").
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: ".swarmtest/swarmtest.db".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// API key; falls back to the ANTHROPIC_API_KEY env var at client
    /// construction.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Base URL of the external execution service.
    pub base_url: String,
    pub api_key: Option<String>,
    /// Address the worker posts results back to.
    pub callback_url: String,
    /// Step budget passed to each dispatched run.
    pub max_steps: u32,
    pub timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_key: None,
            callback_url: "http://localhost:3400/callbacks/runs".to_string(),
            max_steps: 10,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 3400 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub count: usize,
    pub max_concurrency: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { count: 10, max_concurrency: 6 }
    }
}
