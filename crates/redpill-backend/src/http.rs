//! HttpChatBackend - REST implementation of [`ChatBackend`].
//!
//! One endpoint, one shape: `POST <base>/api/chat` with the snake_case
//! request body, plus `GET <base>/health` for the status command.
//!
//! Configuration priority: config file < environment variables
//! (`REDPILL_BACKEND_URL`, `REDPILL_API_KEY`).

use async_trait::async_trait;
use redpill_core::backend::{ChatBackend, ChatReply, ChatRequest};
use redpill_core::config::Config;
use redpill_core::error::{RedpillError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const CHAT_TIMEOUT: Duration = Duration::from_secs(120);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to the research backend over HTTP.
#[derive(Clone)]
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl HttpChatBackend {
    /// Creates a backend client against the given base URL.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Builds a client from loaded config with env overrides applied.
    pub fn from_config(config: &Config) -> Self {
        let config = config.clone().with_env_overrides();
        Self::new(config.backend_url, config.api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    /// Probes `GET <base>/health`.
    pub async fn health(&self) -> Result<HealthReport> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .authorized(self.client.get(&url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| RedpillError::backend(format!("health check failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RedpillError::backend(format!(
                "health check returned {}",
                status
            )));
        }

        response
            .json::<HealthReport>()
            .await
            .map_err(|e| RedpillError::backend(format!("unreadable health response: {}", e)))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = format!("{}/api/chat", self.base_url);
        tracing::debug!(url = %url, project_id = %request.project_id, "sending chat request");

        let response = self
            .authorized(self.client.post(&url))
            .json(request)
            .timeout(CHAT_TIMEOUT)
            .send()
            .await
            .map_err(|e| RedpillError::backend(format!("chat request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable body".to_string());
            let excerpt: String = body.chars().take(200).collect();
            return Err(RedpillError::backend(format!(
                "chat endpoint returned {}: {}",
                status, excerpt
            )));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| RedpillError::backend(format!("unreadable chat response: {}", e)))
    }
}
