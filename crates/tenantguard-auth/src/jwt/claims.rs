//! Claims carried by the live session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims for the live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the user ID.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token ID.
    pub jti: String,
}

impl SessionClaims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    ///
    /// An out-of-range timestamp is treated as already expired.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
