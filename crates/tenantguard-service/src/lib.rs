//! # tenantguard-service
//!
//! The `Backend` façade for TenantGuard. Each service resolves the caller
//! from the live session, consults access control, and reads or writes the
//! document store. Callers (the CLI, a presentation layer, tests) only ever
//! talk to [`Backend`].
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod auth;
pub mod backend;
pub mod context;
pub mod entity;
pub mod integrations;
pub mod notification;
pub mod user;

pub use auth::{AuthService, BootstrapRequest};
pub use backend::{Backend, BackendParts};
pub use context::RequestContext;
pub use entity::{EntityHandle, EntityService};
pub use integrations::{
    HttpLlmProvider, IntegrationGateway, IntegrationService, LlmProvider, LogEmailSender,
    OfflineLlmProvider,
};
pub use notification::{NotificationRules, NotificationService};
pub use user::{AdminRequestService, UserService};
