//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::new_id;

/// An in-app notification addressed to a user by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: String,
    /// Recipient's tenant.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Recipient email.
    pub user_email: String,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Whether the user has read this notification.
    #[serde(default)]
    pub read: bool,
    /// When the notification was created.
    #[serde(rename = "created_date")]
    pub created_date: DateTime<Utc>,
}

impl Notification {
    /// Build an unread notification.
    pub fn new(
        org_id: Option<String>,
        user_email: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_id(),
            org_id,
            user_email: user_email.into(),
            title: title.into(),
            message: message.into(),
            read: false,
            created_date: now,
        }
    }
}
