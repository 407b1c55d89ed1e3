//! Caller-facing integration operations.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use tenantguard_auth::{RateLimiter, SessionManager};
use tenantguard_core::error::AppError;
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::{Clock, EmailSender, OutgoingEmail};
use tenantguard_entity::Notification;
use tenantguard_store::DocumentStore;

use super::gateway::IntegrationGateway;
use super::llm::LlmProvider;
use crate::context::RequestContext;
use crate::notification::{NotificationRules, NotificationService};

/// AI queries, email dispatch, and the external records API.
#[derive(Debug, Clone)]
pub struct IntegrationService {
    store: Arc<DocumentStore>,
    clock: Arc<dyn Clock>,
    sessions: Arc<SessionManager>,
    limiter: Arc<RateLimiter>,
    llm: Arc<dyn LlmProvider>,
    mailer: Arc<dyn EmailSender>,
    gateway: IntegrationGateway,
}

impl IntegrationService {
    /// Creates a new integration service.
    pub fn new(
        store: Arc<DocumentStore>,
        clock: Arc<dyn Clock>,
        sessions: Arc<SessionManager>,
        limiter: Arc<RateLimiter>,
        llm: Arc<dyn LlmProvider>,
        mailer: Arc<dyn EmailSender>,
        gateway: IntegrationGateway,
    ) -> Self {
        Self {
            store,
            clock,
            sessions,
            limiter,
            llm,
            mailer,
            gateway,
        }
    }

    async fn context(&self) -> AppResult<RequestContext> {
        RequestContext::resolve(&self.sessions, &self.store, self.clock.as_ref()).await
    }

    /// Ask the AI assistant, subject to the organization's request quota.
    pub async fn invoke_llm(&self, prompt: &str) -> AppResult<String> {
        let ctx = self.context().await?;
        if prompt.trim().is_empty() {
            return Err(AppError::validation("Prompt cannot be empty"));
        }
        if !self.limiter.allow(&ctx.identity, ctx.org.as_ref()).await {
            warn!(
                bucket = %RateLimiter::bucket_for(&ctx.identity),
                "AI request rate limited"
            );
            return Err(AppError::rate_limited(
                "AI request limit reached for this minute. Try again shortly",
            ));
        }
        self.llm.complete(prompt).await
    }

    /// Send an email and, when the recipient has an account, mirror it as
    /// an in-app notification.
    pub async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let email = OutgoingEmail {
            to: to.trim().to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        };
        self.mailer.send(&email).await?;

        let now = self.clock.now();
        let delivered = self
            .store
            .mutate(|doc| {
                let Some(user) = NotificationRules::known_recipient(doc, &email.to) else {
                    return Ok(false);
                };
                NotificationService::push(
                    doc,
                    &Notification::new(user.org_id, &user.email, subject, body, now),
                )?;
                Ok(true)
            })
            .await?;

        info!(to = %email.to, in_app = delivered, "Email sent");
        Ok(())
    }

    /// Upload a file to the records API; `None` when unavailable.
    pub async fn upload_file(&self, file_name: &str, content: Vec<u8>) -> AppResult<Option<String>> {
        self.context().await?.require_authenticated()?;
        Ok(self.gateway.upload_file(file_name, content).await)
    }

    /// Forward an audit event for the current caller.
    pub async fn audit_log(&self, action: &str, details: Value) -> AppResult<()> {
        let ctx = self.context().await?;
        let event = IntegrationGateway::audit_event(action, &ctx.identity.email, details);
        self.gateway.audit_log(&event).await;
        Ok(())
    }

    /// Document-vault entries for the caller's organization.
    pub async fn vault_documents(&self) -> AppResult<Vec<Value>> {
        let ctx = self.context().await?;
        if ctx.identity.is_guest() {
            return Ok(Vec::new());
        }
        Ok(self.gateway.vault_documents(ctx.org_id()).await)
    }
}
