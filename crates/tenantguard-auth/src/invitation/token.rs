//! Invitation token generation.

use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};

/// Length of an invitation token.
pub const TOKEN_LEN: usize = 32;

/// Generates an opaque alphanumeric invitation token.
pub fn generate_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
