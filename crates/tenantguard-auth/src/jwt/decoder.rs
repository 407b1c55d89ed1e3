//! Session token verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use tenantguard_core::config::AuthConfig;
use tenantguard_core::error::AppError;

use super::claims::SessionClaims;

/// Verifies session token signatures.
///
/// Expiry is not checked here: the session manager compares `exp` against
/// its injected clock so tests can move time.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        Self {
            decoding_key: DecodingKey::from_secret(config.session_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies the signature and returns the claims.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, AppError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::access_denied("Invalid session token signature")
                }
                _ => AppError::access_denied(format!("Session token rejected: {e}")),
            })?;

        Ok(token_data.claims)
    }
}
