use thiserror::Error;

/// Persistence-layer error surfaced through the repository ports.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("UUID parse error: {0}")]
    UuidParse(#[from] uuid::Error),

    #[error("DateTime parse error: {0}")]
    DateTimeParse(#[from] chrono::ParseError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),
}
