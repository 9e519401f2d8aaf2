//! Port for the generative model used by persona generation.

use async_trait::async_trait;

use crate::domain::error::ModelError;

/// Structured-generation client: one prompt in, one JSON object out.
///
/// Implementations must return the raw JSON object; schema validation and
/// range checks happen in the domain, not in the client.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, ModelError>;
}
