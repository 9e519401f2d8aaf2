//! HTTP client for the external browser-automation execution service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use tracing::debug;
use uuid::Uuid;

use crate::domain::error::RunnerError;
use crate::domain::models::RunnerConfig;
use crate::domain::ports::{DispatchAck, DispatchRequest, RunnerClient};

pub struct HttpRunnerClient {
    http: ReqwestClient,
    base_url: String,
    api_key: String,
}

impl HttpRunnerClient {
    pub fn new(config: &RunnerConfig) -> Result<Self, RunnerError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| RunnerError::NotConfigured("runner api_key is not set".to_string()))?;

        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RunnerError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl RunnerClient for HttpRunnerClient {
    async fn start_run(
        &self,
        request: &DispatchRequest,
        slot_id: Uuid,
        callback_url: &str,
    ) -> Result<DispatchAck, RunnerError> {
        let response = self
            .http
            .post(format!("{}/run", self.base_url))
            .header("X-API-Key", &self.api_key)
            .header("X-Callback-URL", callback_url)
            .header("X-Test-Run-ID", slot_id.to_string())
            .json(request)
            .send()
            .await
            .map_err(|e| RunnerError::Network(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // 202 is the normal ack; some deployments answer 200 with a JSON
        // body whose status field says "accepted".
        let accepted = status.is_success()
            || serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("status").and_then(|s| s.as_str().map(String::from)))
                .is_some_and(|s| s == "accepted");

        if !accepted {
            return Err(RunnerError::Rejected { status: status.as_u16(), body });
        }

        let ack: DispatchAck = serde_json::from_str(&body).unwrap_or_default();
        debug!(slot_id = %slot_id, run_ref = ack.run_ref.as_deref().unwrap_or("-"), "runner accepted");
        Ok(ack)
    }

    async fn health(&self) -> bool {
        match self.http.get(format!("{}/health", self.base_url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
