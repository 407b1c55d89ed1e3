//! Client for the external records API.
//!
//! Every call degrades instead of failing: with no base URL configured, or
//! on any transport or status error, uploads yield `None`, audit writes are
//! dropped, and vault listings are empty.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use tenantguard_core::config::IntegrationsConfig;
use tenantguard_core::error::{AppError, ErrorKind};
use tenantguard_core::result::AppResult;

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(alias = "file_url")]
    url: String,
}

/// HTTP client for uploads, audit events, and the document vault.
#[derive(Debug, Clone)]
pub struct IntegrationGateway {
    http: Client,
    base_url: Option<String>,
}

impl IntegrationGateway {
    /// Build a gateway from configuration.
    pub fn new(config: &IntegrationsConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            http,
            base_url: config
                .api_base_url
                .as_deref()
                .map(|u| u.trim_end_matches('/').to_string()),
        })
    }

    /// Whether a base URL is configured.
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    fn url(&self, path: &str) -> Option<String> {
        self.base_url.as_ref().map(|base| format!("{base}/{path}"))
    }

    /// Upload a file; returns its hosted URL.
    pub async fn upload_file(&self, file_name: &str, content: Vec<u8>) -> Option<String> {
        let url = self.url("files")?;
        let result = self.post_upload(&url, file_name, content).await;

        match result {
            Ok(body) => Some(body.url),
            Err(e) => {
                warn!(file = %file_name, error = %e, "Upload failed; continuing without file");
                None
            }
        }
    }

    /// Forward an audit event.
    pub async fn audit_log(&self, event: &Value) {
        let Some(url) = self.url("audit-log") else {
            debug!("No records API configured; audit event dropped");
            return;
        };
        let result = self
            .http
            .post(&url)
            .json(event)
            .send()
            .await
            .and_then(|r| r.error_for_status());
        if let Err(e) = result {
            warn!(error = %e, "Audit event not delivered");
        }
    }

    /// Document-vault entries for an organization.
    pub async fn vault_documents(&self, org_id: Option<&str>) -> Vec<Value> {
        let Some(url) = self.url("vault/documents") else {
            return Vec::new();
        };
        let result = self.get_vault(&url, org_id.unwrap_or_default()).await;

        match result {
            Ok(Value::Array(items)) => items,
            Ok(Value::Object(mut body)) => match body.remove("documents") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            Ok(_) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Vault listing unavailable");
                Vec::new()
            }
        }
    }

    async fn post_upload(
        &self,
        url: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<UploadResponse, reqwest::Error> {
        self.http
            .post(url)
            .query(&[("name", file_name)])
            .body(content)
            .send()
            .await?
            .error_for_status()?
            .json::<UploadResponse>()
            .await
    }

    async fn get_vault(&self, url: &str, org_id: &str) -> Result<Value, reqwest::Error> {
        self.http
            .get(url)
            .query(&[("orgId", org_id)])
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await
    }

    /// Audit event body.
    pub fn audit_event(action: &str, actor: &str, details: Value) -> Value {
        json!({ "action": action, "actor": actor, "details": details })
    }
}
