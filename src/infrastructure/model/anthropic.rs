//! Anthropic Messages API client for persona generation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::error::ModelError;
use crate::domain::models::ModelConfig;
use crate::domain::ports::ModelClient;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicModelClient {
    http: ReqwestClient,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl AnthropicModelClient {
    /// Build a client from configuration. The API key falls back to the
    /// ANTHROPIC_API_KEY environment variable.
    pub fn new(config: &ModelConfig) -> Result<Self, ModelError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or(ModelError::InvalidApiKey)?;

        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ModelClient for AnthropicModelClient {
    async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, ModelError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message { role: "user", content: prompt }],
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ModelError::InvalidApiKey,
                StatusCode::TOO_MANY_REQUESTS => ModelError::RateLimitExceeded(body),
                _ => ModelError::Api { status: status.as_u16(), message: body },
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ModelError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default();
        debug!(chars = text.len(), "model response received");

        extract_json_object(text)
    }
}

/// Pull the first JSON object out of a response that may carry prose or a
/// code fence around it.
fn extract_json_object(text: &str) -> Result<serde_json::Value, ModelError> {
    let start = text.find('{');
    let end = text.rfind('}');
    let (Some(start), Some(end)) = (start, end) else {
        return Err(ModelError::MalformedResponse(
            "no JSON object in model response".to_string(),
        ));
    };
    if end < start {
        return Err(ModelError::MalformedResponse(
            "unbalanced JSON object in model response".to_string(),
        ));
    }
    serde_json::from_str(&text[start..=end]).map_err(|e| ModelError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bare_object() {
        let value = extract_json_object(r#"{"name": "Jamie"}"#).unwrap();
        assert_eq!(value["name"], "Jamie");
    }

    #[test]
    fn extracts_object_inside_code_fence() {
        let text = "Here is the persona:\n```json\n{\"name\": \"Jamie\", \"age\": 29}\n```\nDone.";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["age"], 29);
    }

    #[test]
    fn rejects_text_without_object() {
        assert!(extract_json_object("no json here").is_err());
        assert!(extract_json_object("} backwards {").is_err());
    }
}
