//! Email delivery without an outbound relay.

use async_trait::async_trait;
use tracing::info;

use tenantguard_core::result::AppResult;
use tenantguard_core::traits::{EmailSender, OutgoingEmail};

/// Records outgoing mail in the log instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> AppResult<()> {
        info!(to = %email.to, subject = %email.subject, body = %email.body, "Email dispatched");
        Ok(())
    }
}
