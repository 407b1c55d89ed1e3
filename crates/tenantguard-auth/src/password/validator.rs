//! Password policy enforcement for new passwords.

use tenantguard_core::config::AuthConfig;
use tenantguard_core::error::AppError;

/// Validates new passwords: minimum length, an uppercase letter, a digit.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password against the policy.
    ///
    /// Returns `Ok(())` if the password meets all requirements, or a
    /// `WeakPassword` error describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::weak_password(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(char::is_uppercase) {
            return Err(AppError::weak_password(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::weak_password(
                "Password must contain at least one digit",
            ));
        }

        Ok(())
    }
}

impl Default for PasswordValidator {
    fn default() -> Self {
        Self::new(&AuthConfig::default())
    }
}
