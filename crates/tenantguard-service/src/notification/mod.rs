//! In-app notifications and recipient resolution.

pub mod rules;
pub mod service;

pub use rules::NotificationRules;
pub use service::NotificationService;
