//! Domain-level error types, one enum per concern.

use thiserror::Error;

/// Errors from the persona generation pipeline. Any unit failure fails the
/// whole batch call; there is no partial result.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Persona validation failed: {0}")]
    Validation(String),

    #[error("Model call failed: {0}")]
    Model(#[from] ModelError),

    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),
}

/// Errors from the generative model client.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid or missing API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Model API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model response was not valid JSON: {0}")]
    MalformedResponse(String),
}

/// Errors from the external execution service client.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Runner rejected dispatch ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Network error reaching runner: {0}")]
    Network(String),

    #[error("Runner not configured: {0}")]
    NotConfigured(String),
}

/// Errors from batch dispatch. Scoped to one slot; siblings are unaffected.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("No personas to dispatch")]
    EmptyBatch,

    #[error("Persistence failure: {0}")]
    Database(#[from] crate::domain::ports::DatabaseError),
}

/// Errors from callback ingestion. Only persistence failures surface; an
/// unlinkable callback is an outcome, not an error.
#[derive(Error, Debug)]
pub enum CallbackError {
    #[error("Persistence failure: {0}")]
    Database(#[from] crate::domain::ports::DatabaseError),
}
