//! Outbound email seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A message handed to an [`EmailSender`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Delivers email. Production wiring logs or relays; tests capture.
#[async_trait]
pub trait EmailSender: Send + Sync + std::fmt::Debug + 'static {
    /// Send one message.
    async fn send(&self, email: &OutgoingEmail) -> AppResult<()>;
}
