//! Admin-access requests: members ask, owners decide.

use std::sync::Arc;

use tracing::{info, warn};

use tenantguard_auth::SessionManager;
use tenantguard_core::error::AppError;
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::{Clock, EmailSender, OutgoingEmail};
use tenantguard_entity::{
    ActivityLog, AdminRequest, AdminRequestStatus, EntityType, Notification, Role, User, new_id,
};
use tenantguard_store::DocumentStore;

use crate::context::RequestContext;
use crate::notification::{NotificationRules, NotificationService};

/// Handles the admin-request workflow.
#[derive(Debug, Clone)]
pub struct AdminRequestService {
    store: Arc<DocumentStore>,
    clock: Arc<dyn Clock>,
    sessions: Arc<SessionManager>,
    mailer: Arc<dyn EmailSender>,
}

impl AdminRequestService {
    /// Creates a new admin request service.
    pub fn new(
        store: Arc<DocumentStore>,
        clock: Arc<dyn Clock>,
        sessions: Arc<SessionManager>,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            store,
            clock,
            sessions,
            mailer,
        }
    }

    async fn context(&self) -> AppResult<RequestContext> {
        RequestContext::resolve(&self.sessions, &self.store, self.clock.as_ref()).await
    }

    /// File a pending request to become an admin and tell the org owner.
    ///
    /// A caller with a pending request gets that request back.
    pub async fn request_admin_access(&self, reason: &str) -> AppResult<AdminRequest> {
        let ctx = self.context().await?;
        ctx.require_authenticated()?;
        if ctx.is_privileged() {
            return Err(AppError::conflict("You already have administrative access"));
        }

        let now = ctx.request_time;
        let (request, owner, created) = self
            .store
            .mutate(|doc| {
                let owner = NotificationRules::org_owner(doc, ctx.org_id());
                let existing = doc
                    .typed::<AdminRequest>(EntityType::AdminRequest)
                    .into_iter()
                    .find(|r| r.is_pending() && r.email.eq_ignore_ascii_case(&ctx.identity.email));
                if let Some(existing) = existing {
                    return Ok((existing, owner, false));
                }

                let request = AdminRequest {
                    id: new_id(),
                    email: ctx.identity.email.clone(),
                    reason: reason.trim().to_string(),
                    requested_by: ctx.identity.id.clone(),
                    org_id: ctx.identity.org_id.clone(),
                    status: AdminRequestStatus::Pending,
                    decided_by: None,
                    decided_at: None,
                    created_date: now,
                };
                doc.upsert(EntityType::AdminRequest, &request)?;
                if let Some(owner) = &owner {
                    NotificationService::push(
                        doc,
                        &Notification::new(
                            request.org_id.clone(),
                            owner,
                            "Admin access requested",
                            format!("{} asked for admin access: {}", request.email, request.reason),
                            now,
                        ),
                    )?;
                }
                Ok((request, owner, true))
            })
            .await?;

        if !created {
            return Ok(request);
        }

        match owner {
            Some(owner) => {
                let email = OutgoingEmail {
                    to: owner.clone(),
                    subject: format!("Admin access request from {}", request.email),
                    body: format!(
                        "{} requested admin access.\n\nReason: {}\n\nReview it in the Admin Requests panel.",
                        request.email, request.reason
                    ),
                };
                if let Err(e) = self.mailer.send(&email).await {
                    warn!(to = %owner, error = %e, "Failed to email admin request");
                }
            }
            None => warn!(org_id = ?request.org_id, "No owner to notify of admin request"),
        }

        info!(request_id = %request.id, email = %request.email, "Admin access requested");
        Ok(request)
    }

    /// Approve a pending request and promote the requester to `admin`.
    pub async fn approve_admin_request(&self, request_id: &str) -> AppResult<AdminRequest> {
        self.decide(request_id, AdminRequestStatus::Approved).await
    }

    /// Deny a pending request.
    pub async fn deny_admin_request(&self, request_id: &str) -> AppResult<AdminRequest> {
        self.decide(request_id, AdminRequestStatus::Denied).await
    }

    async fn decide(
        &self,
        request_id: &str,
        decision: AdminRequestStatus,
    ) -> AppResult<AdminRequest> {
        let ctx = self.context().await?;
        if !ctx.is_owner() {
            return Err(AppError::permission_denied(
                "Only an owner can decide admin requests",
            ));
        }

        let now = ctx.request_time;
        let request = self
            .store
            .mutate(|doc| {
                let mut request: AdminRequest = doc
                    .get_typed(EntityType::AdminRequest, request_id)?
                    .ok_or_else(|| AppError::not_found("Admin request not found"))?;
                if !request.is_pending() {
                    return Err(AppError::conflict(format!(
                        "Admin request is already {}",
                        request.status.as_str()
                    )));
                }

                request.status = decision;
                request.decided_by = Some(ctx.identity.email.clone());
                request.decided_at = Some(now);
                doc.upsert(EntityType::AdminRequest, &request)?;

                if decision == AdminRequestStatus::Approved
                    && let Some(mut user) = doc.user_by_email(&request.email)
                {
                    user.role = Role::Admin;
                    doc.upsert::<User>(EntityType::User, &user)?;
                }

                let verb = decision.as_str();
                doc.upsert(
                    EntityType::ActivityLog,
                    &ActivityLog::new(
                        request.org_id.clone(),
                        &ctx.identity.email,
                        format!("admin_request.{verb}"),
                        EntityType::AdminRequest.as_str(),
                        Some(request.id.clone()),
                        format!("Admin request from {} {verb}", request.email),
                        now,
                    ),
                )?;
                NotificationService::push(
                    doc,
                    &Notification::new(
                        request.org_id.clone(),
                        &request.email,
                        format!("Admin request {verb}"),
                        format!("Your admin access request was {verb} by {}", ctx.identity.email),
                        now,
                    ),
                )?;
                Ok(request)
            })
            .await?;

        info!(
            request_id = %request.id,
            status = %request.status.as_str(),
            actor = %ctx.identity.email,
            "Admin request decided"
        );
        Ok(request)
    }
}
