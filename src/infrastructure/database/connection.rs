use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

use crate::domain::ports::DatabaseError;

/// SQLite connection pool with WAL mode enabled for concurrent access.
pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    /// Open a pooled connection to `database_url`
    /// (e.g. "sqlite:.swarmtest/swarmtest.db" or "sqlite::memory:").
    pub async fn new(database_url: &str) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(DatabaseError::QueryFailed)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        // An in-memory database exists per connection, so the pool must not
        // hand out a second one.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 10 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(Duration::from_secs(30))
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Apply pending migrations. Safe to call on every startup.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_pool_and_migrates() {
        let db = DatabaseConnection::new("sqlite::memory:")
            .await
            .expect("failed to create connection");
        db.migrate().await.expect("failed to run migrations");

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE '_sqlx%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .expect("failed to query tables");

        let names: Vec<String> = tables.into_iter().map(|t| t.0).collect();
        assert!(names.contains(&"batch_runs".to_string()));
        assert!(names.contains(&"test_slots".to_string()));
        assert!(names.contains(&"unlinked_callbacks".to_string()));

        db.close().await;
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = DatabaseConnection::new("sqlite::memory:")
            .await
            .expect("failed to create connection");
        db.migrate().await.expect("failed to run migrations");

        let result: (i32,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .expect("failed to read pragma");
        assert_eq!(result.0, 1);

        db.close().await;
    }
}
