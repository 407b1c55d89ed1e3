//! Invitation issuance and redemption.

pub mod service;
pub mod token;

pub use service::{InvitationService, InviteLookup, InviteOutcome, InviteState, NewInvite};
pub use token::generate_token;
