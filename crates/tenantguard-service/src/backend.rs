//! The façade every caller goes through.

use std::sync::Arc;

use tracing::info;

use tenantguard_auth::{InvitationService, LoginGuard, RateLimiter, SessionManager};
use tenantguard_core::config::AppConfig;
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::{Clock, EmailSender, KeyValueStore, SystemClock};
use tenantguard_entity::EntityType;
use tenantguard_store::{DocumentStore, KvStoreManager};

use crate::auth::AuthService;
use crate::entity::{EntityHandle, EntityService};
use crate::integrations::{
    HttpLlmProvider, IntegrationGateway, IntegrationService, LlmProvider, LogEmailSender,
};
use crate::notification::NotificationService;
use crate::user::{AdminRequestService, UserService};

/// Pluggable collaborators for [`Backend::with_parts`].
#[derive(Debug, Clone)]
pub struct BackendParts {
    /// Persistence backend for the document, session, and guard keys.
    pub kv: Arc<dyn KeyValueStore>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Outbound email.
    pub mailer: Arc<dyn EmailSender>,
    /// AI assistant.
    pub llm: Arc<dyn LlmProvider>,
}

/// Composes the store, auth layers, and services into the four surfaces.
#[derive(Debug, Clone)]
pub struct Backend {
    store: Arc<DocumentStore>,
    sessions: Arc<SessionManager>,
    auth: AuthService,
    users: UserService,
    admin_requests: AdminRequestService,
    notifications: NotificationService,
    entities: EntityService,
    integrations: IntegrationService,
}

impl Backend {
    /// Build a backend from configuration with production collaborators:
    /// the configured key-value backend, the system clock, log-only email,
    /// and the configured (or offline) AI provider.
    pub async fn open(config: &AppConfig) -> AppResult<Self> {
        let kv = KvStoreManager::new(&config.store).await?.store();
        let parts = BackendParts {
            kv,
            clock: Arc::new(SystemClock),
            mailer: Arc::new(LogEmailSender),
            llm: HttpLlmProvider::from_config(&config.integrations)?,
        };
        Self::with_parts(config, parts)
    }

    /// Build a backend from explicit collaborators.
    pub fn with_parts(config: &AppConfig, parts: BackendParts) -> AppResult<Self> {
        let BackendParts {
            kv,
            clock,
            mailer,
            llm,
        } = parts;

        // ── Store ────────────────────────────────────────────────────
        let store = Arc::new(DocumentStore::new(Arc::clone(&kv), Arc::clone(&clock)));

        // ── Auth layers ──────────────────────────────────────────────
        let sessions = Arc::new(SessionManager::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            &config.auth,
        ));
        let guard = Arc::new(LoginGuard::new(
            Arc::clone(&kv),
            Arc::clone(&clock),
            &config.auth,
        ));
        let limiter = Arc::new(RateLimiter::new(Arc::clone(&clock), &config.rate_limit));
        let invitations = Arc::new(InvitationService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            Arc::clone(&mailer),
            &config.auth,
        ));

        // ── Services ─────────────────────────────────────────────────
        let auth = AuthService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            Arc::clone(&sessions),
            guard,
            Arc::clone(&limiter),
            &config.auth,
        );
        let users = UserService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            Arc::clone(&sessions),
            invitations,
            &config.auth,
        );
        let admin_requests = AdminRequestService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            Arc::clone(&sessions),
            Arc::clone(&mailer),
        );
        let notifications = NotificationService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            Arc::clone(&sessions),
        );
        let entities = EntityService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            Arc::clone(&sessions),
        );
        let integrations = IntegrationService::new(
            Arc::clone(&store),
            clock,
            Arc::clone(&sessions),
            limiter,
            llm,
            mailer,
            IntegrationGateway::new(&config.integrations)?,
        );

        info!("Backend initialized");
        Ok(Self {
            store,
            sessions,
            auth,
            users,
            admin_requests,
            notifications,
            entities,
            integrations,
        })
    }

    /// Login, logout, bootstrap, and session upkeep.
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Invitations, roles, and passwords.
    pub fn users(&self) -> &UserService {
        &self.users
    }

    /// Admin-access requests.
    pub fn admin_requests(&self) -> &AdminRequestService {
        &self.admin_requests
    }

    /// The caller's in-app notifications.
    pub fn notifications(&self) -> &NotificationService {
        &self.notifications
    }

    /// Record operations on one entity collection.
    pub fn entities(&self, entity_type: EntityType) -> EntityHandle<'_> {
        EntityHandle::new(&self.entities, entity_type)
    }

    /// AI queries, email, and the external records API.
    pub fn integrations(&self) -> &IntegrationService {
        &self.integrations
    }

    /// The underlying document store.
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// The live session manager.
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }
}
