//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid generation count: {0}. Must be between 1 and 100")]
    InvalidCount(usize),

    #[error("Invalid max_concurrency: {0}. Must be between 1 and 32")]
    InvalidConcurrency(usize),

    #[error("Invalid max_steps: {0}. Must be at least 1")]
    InvalidMaxSteps(u32),

    #[error("Callback URL cannot be empty")]
    EmptyCallbackUrl,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .swarmtest/config.yaml (project config)
    /// 3. .swarmtest/local.yaml (local overrides, optional)
    /// 4. Environment variables (SWARMTEST_* prefix)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".swarmtest/config.yaml"))
            .merge(Yaml::file(".swarmtest/local.yaml"))
            .merge(Env::prefixed("SWARMTEST_").split("__"))
            .extract()
            .context("Failed to extract configuration")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a single file, for tests and one-off runs.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context("Failed to extract configuration")?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.generation.count == 0 || config.generation.count > 100 {
            return Err(ConfigError::InvalidCount(config.generation.count));
        }
        if config.generation.max_concurrency == 0 || config.generation.max_concurrency > 32 {
            return Err(ConfigError::InvalidConcurrency(config.generation.max_concurrency));
        }
        if config.runner.max_steps == 0 {
            return Err(ConfigError::InvalidMaxSteps(config.runner.max_steps));
        }
        if config.runner.callback_url.trim().is_empty() {
            return Err(ConfigError::EmptyCallbackUrl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(ConfigLoader::validate(&Config::default()).is_ok());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let mut config = Config::default();
        config.generation.max_concurrency = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidConcurrency(0))
        ));
    }

    #[test]
    fn empty_database_path_is_rejected() {
        let mut config = Config::default();
        config.database.path = "  ".into();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDatabasePath)
        ));
    }
}
