//! Notification creation and read-state management.

use std::sync::Arc;

use tracing::info;

use tenantguard_auth::SessionManager;
use tenantguard_core::error::AppError;
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::Clock;
use tenantguard_entity::{EntityType, Notification};
use tenantguard_store::{DocumentStore, StoreDocument};

use crate::context::RequestContext;

/// Manages in-app notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: Arc<DocumentStore>,
    clock: Arc<dyn Clock>,
    sessions: Arc<SessionManager>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        store: Arc<DocumentStore>,
        clock: Arc<dyn Clock>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            store,
            clock,
            sessions,
        }
    }

    /// Append a notification inside an ongoing mutation.
    pub fn push(doc: &mut StoreDocument, notification: &Notification) -> AppResult<()> {
        doc.upsert(EntityType::Notification, notification)
    }

    /// Create and persist a notification for `user_email`.
    pub async fn notify(
        &self,
        org_id: Option<String>,
        user_email: &str,
        title: &str,
        message: &str,
    ) -> AppResult<Notification> {
        let notification =
            Notification::new(org_id, user_email, title, message, self.clock.now());
        self.store
            .mutate(|doc| Self::push(doc, &notification))
            .await?;
        info!(to = %user_email, title = %title, "Notification created");
        Ok(notification)
    }

    /// The caller's notifications, newest first.
    pub async fn list_mine(&self) -> AppResult<Vec<Notification>> {
        let ctx = self.context().await?;
        ctx.require_authenticated()?;

        let mut mine = self
            .store
            .read(|doc| doc.typed::<Notification>(EntityType::Notification))
            .await?
            .into_iter()
            .filter(|n| n.user_email.eq_ignore_ascii_case(&ctx.identity.email))
            .collect::<Vec<_>>();
        mine.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        Ok(mine)
    }

    /// Number of the caller's unread notifications.
    pub async fn unread_count(&self) -> AppResult<usize> {
        Ok(self.list_mine().await?.iter().filter(|n| !n.read).count())
    }

    /// Mark one of the caller's notifications as read.
    pub async fn mark_read(&self, notification_id: &str) -> AppResult<()> {
        let ctx = self.context().await?;
        ctx.require_authenticated()?;

        self.store
            .mutate(|doc| {
                let mut notification: Notification = doc
                    .get_typed(EntityType::Notification, notification_id)?
                    .filter(|n: &Notification| {
                        n.user_email.eq_ignore_ascii_case(&ctx.identity.email)
                    })
                    .ok_or_else(|| AppError::not_found("Notification not found"))?;
                notification.read = true;
                doc.upsert(EntityType::Notification, &notification)
            })
            .await
    }

    async fn context(&self) -> AppResult<RequestContext> {
        RequestContext::resolve(&self.sessions, &self.store, self.clock.as_ref()).await
    }
}
