//! Live session lifecycle: start, resolve, touch, end.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tenantguard_core::config::AuthConfig;
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::{Clock, KeyValueStore};
use tenantguard_entity::{EntityType, Identity, Organization, User};
use tenantguard_store::{DocumentStore, keys};

use super::store::{record_session_ended, record_session_started};
use crate::jwt::{JwtDecoder, JwtEncoder};

/// The live session descriptor held (signed) under the session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSession {
    /// The logged-in user.
    pub user_id: String,
    /// When the session lapses without a touch.
    pub expires_at: DateTime<Utc>,
}

/// Manages the single live session of this context.
///
/// A second login overwrites the first. Expiry is evaluated lazily against
/// the injected clock whenever the session is read.
pub struct SessionManager {
    /// Backend holding the signed token.
    kv: Arc<dyn KeyValueStore>,
    /// Document store for user lookups and `Session` rows.
    store: Arc<DocumentStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Token signer.
    encoder: JwtEncoder,
    /// Token verifier.
    decoder: JwtDecoder,
    /// TTL when the organization does not configure one.
    default_ttl_mins: i64,
    /// Floor for organization-configured TTLs.
    min_ttl_mins: i64,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("default_ttl_mins", &self.default_ttl_mins)
            .field("min_ttl_mins", &self.min_ttl_mins)
            .finish()
    }
}

impl SessionManager {
    /// Creates a session manager over the store's backend.
    pub fn new(store: Arc<DocumentStore>, clock: Arc<dyn Clock>, config: &AuthConfig) -> Self {
        Self {
            kv: Arc::clone(store.kv()),
            store,
            clock,
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
            default_ttl_mins: config.default_session_timeout_mins,
            min_ttl_mins: config.min_session_timeout_mins,
        }
    }

    /// Read the stored session descriptor, expired or not.
    ///
    /// A token that fails verification is treated as absent and cleared.
    pub async fn get_session(&self) -> AppResult<Option<LiveSession>> {
        let Some(bytes) = self.kv.get(&keys::session()).await? else {
            return Ok(None);
        };

        let claims = String::from_utf8(bytes)
            .map_err(|e| e.to_string())
            .and_then(|token| {
                self.decoder
                    .decode(token.trim())
                    .map_err(|e| e.to_string())
            });

        match claims {
            Ok(claims) => Ok(Some(LiveSession {
                expires_at: claims.expires_at(),
                user_id: claims.sub,
            })),
            Err(error) => {
                warn!(%error, "Discarding unverifiable session token");
                self.kv.remove(&keys::session()).await?;
                Ok(None)
            }
        }
    }

    /// Write (or with `None`, clear) the session descriptor.
    pub async fn set_session(&self, session: Option<&LiveSession>) -> AppResult<()> {
        match session {
            Some(session) => {
                let token =
                    self.encoder
                        .encode(&session.user_id, self.clock.now(), session.expires_at)?;
                self.kv.set(&keys::session(), token.as_bytes()).await
            }
            None => self.kv.remove(&keys::session()).await,
        }
    }

    /// The session if it has not expired. An expired session is cleared.
    pub async fn active_session(&self) -> AppResult<Option<LiveSession>> {
        let Some(session) = self.get_session().await? else {
            return Ok(None);
        };

        if self.clock.now() >= session.expires_at {
            debug!(user_id = %session.user_id, "Session expired");
            self.set_session(None).await?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// The user behind the live session, if any.
    ///
    /// A session pointing at a deleted user is cleared.
    pub async fn current_user(&self) -> AppResult<Option<User>> {
        let Some(session) = self.active_session().await? else {
            return Ok(None);
        };

        let user = self
            .store
            .read(|doc| doc.get_typed::<User>(EntityType::User, &session.user_id))
            .await?
            .ok()
            .flatten();

        if user.is_none() {
            warn!(user_id = %session.user_id, "Session refers to an unknown user; clearing");
            self.set_session(None).await?;
        }
        Ok(user)
    }

    /// The caller's identity; the fixed guest identity without a live session.
    pub async fn current_identity(&self) -> AppResult<Identity> {
        Ok(self
            .current_user()
            .await?
            .as_ref()
            .map(Identity::from)
            .unwrap_or_else(Identity::guest))
    }

    /// Session TTL for an organization: its `sessionTimeoutMins` floored at
    /// the configured minimum, or the default when unset or absent.
    pub fn ttl_for(&self, org: Option<&Organization>) -> Duration {
        let mins = org
            .and_then(|o| o.security.session_timeout_mins)
            .unwrap_or(self.default_ttl_mins)
            .max(self.min_ttl_mins);
        Duration::minutes(mins)
    }

    /// Begin a session for `user`, replacing any live session.
    pub async fn start(&self, user: &User) -> AppResult<LiveSession> {
        let now = self.clock.now();
        let session = LiveSession {
            user_id: user.id.clone(),
            expires_at: now + self.ttl_for_user(user).await?,
        };

        self.set_session(Some(&session)).await?;
        self.store
            .mutate(|doc| record_session_started(doc, user, now, session.expires_at, true))
            .await?;

        info!(user_id = %user.id, expires_at = %session.expires_at, "Session started");
        Ok(session)
    }

    /// Extend the live session from now. No-op without a live session.
    pub async fn touch(&self) -> AppResult<Option<LiveSession>> {
        let Some(user) = self.current_user().await? else {
            return Ok(None);
        };

        let now = self.clock.now();
        let session = LiveSession {
            user_id: user.id.clone(),
            expires_at: now + self.ttl_for_user(&user).await?,
        };

        self.set_session(Some(&session)).await?;
        self.store
            .mutate(|doc| record_session_started(doc, &user, now, session.expires_at, false))
            .await?;

        debug!(user_id = %user.id, expires_at = %session.expires_at, "Session extended");
        Ok(Some(session))
    }

    /// End the session: mark the user's row ended and clear the token.
    pub async fn end(&self) -> AppResult<()> {
        if let Some(session) = self.get_session().await? {
            let now = self.clock.now();
            self.store
                .mutate(|doc| record_session_ended(doc, &session.user_id, now))
                .await?;
            info!(user_id = %session.user_id, "Session ended");
        }
        self.set_session(None).await
    }

    async fn ttl_for_user(&self, user: &User) -> AppResult<Duration> {
        let org = match &user.org_id {
            Some(org_id) => self
                .store
                .read(|doc| doc.get_typed::<Organization>(EntityType::Organization, org_id))
                .await?
                .ok()
                .flatten(),
            None => None,
        };
        Ok(self.ttl_for(org.as_ref()))
    }
}
