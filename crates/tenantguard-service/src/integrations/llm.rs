//! AI-query providers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use tenantguard_core::config::IntegrationsConfig;
use tenantguard_core::error::{AppError, ErrorKind};
use tenantguard_core::result::AppResult;

/// Answers assistant prompts.
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Complete a prompt.
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}

/// Used when no endpoint is configured.
#[derive(Debug, Clone, Default)]
pub struct OfflineLlmProvider;

#[async_trait]
impl LlmProvider for OfflineLlmProvider {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        debug!(prompt_len = prompt.len(), "Offline assistant reply");
        Ok(format!(
            "The AI assistant is not connected. Your question was recorded: \"{}\"",
            prompt.trim()
        ))
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(alias = "text", alias = "output")]
    response: String,
}

/// Posts `{"prompt": ...}` to a configured endpoint and reads back
/// `{"response": ...}`.
#[derive(Debug, Clone)]
pub struct HttpLlmProvider {
    http: Client,
    endpoint: String,
}

impl HttpLlmProvider {
    /// Build a provider for `endpoint`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// The configured provider, or the offline one without an endpoint.
    pub fn from_config(config: &IntegrationsConfig) -> AppResult<std::sync::Arc<dyn LlmProvider>> {
        match &config.llm_endpoint {
            Some(endpoint) => Ok(std::sync::Arc::new(Self::new(
                endpoint.as_str(),
                Duration::from_secs(config.timeout_seconds),
            )?)),
            None => Ok(std::sync::Arc::new(OfflineLlmProvider)),
        }
    }
}

#[async_trait]
impl LlmProvider for HttpLlmProvider {
    #[instrument(skip(self, prompt))]
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&CompletionRequest { prompt })
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "AI request failed", e)
            })?;

        if !resp.status().is_success() {
            return Err(AppError::external_service(format!(
                "AI endpoint returned {}",
                resp.status()
            )));
        }

        let body: CompletionResponse = resp.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Malformed AI response", e)
        })?;
        Ok(body.response)
    }
}
