//! Integrations surface: AI queries, email, and the external records API.

pub mod gateway;
pub mod llm;
pub mod mail;
pub mod service;

pub use gateway::IntegrationGateway;
pub use llm::{HttpLlmProvider, LlmProvider, OfflineLlmProvider};
pub use mail::LogEmailSender;
pub use service::IntegrationService;
