//! CLI command implementations.

pub mod dispatch;
pub mod generate;
pub mod serve;
pub mod status;

use anyhow::{Context, Result};

use crate::domain::models::Config;
use crate::infrastructure::database::DatabaseConnection;

/// Open the configured database, creating its directory on first use, and
/// apply pending migrations.
pub(crate) async fn open_database(config: &Config) -> Result<DatabaseConnection> {
    let path = std::path::Path::new(&config.database.path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let db = DatabaseConnection::new(&format!("sqlite:{}", config.database.path))
        .await
        .context("Failed to open database")?;
    db.migrate().await.context("Failed to run migrations")?;
    Ok(db)
}
