//! PBKDF2-HMAC-SHA256 password hashing and verification.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use tenantguard_core::config::AuthConfig;

/// Derived key length in bytes.
const KEY_LEN: usize = 32;

/// Salt length in bytes (before hex encoding).
const SALT_LEN: usize = 16;

/// Hashes and verifies passwords with PBKDF2-HMAC-SHA256.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// PBKDF2 iteration count.
    iterations: u32,
}

impl PasswordHasher {
    /// Creates a hasher from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_iterations(config.pbkdf2_iterations)
    }

    /// Creates a hasher with an explicit iteration count.
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    /// Derives a 32-byte key from `password` and the hex `salt`, hex-encoded.
    pub fn hash_password(&self, password: &str, salt: &str) -> String {
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), self.iterations, &mut key);
        hex::encode(key)
    }

    /// Recomputes the hash and compares it with `expected` in constant time.
    pub fn verify_password(&self, password: &str, salt: &str, expected: &str) -> bool {
        let actual = self.hash_password(password, salt);
        actual.as_bytes().ct_eq(expected.as_bytes()).into()
    }

    /// Generates a fresh 16-byte salt from the OS CSPRNG, hex-encoded.
    pub fn generate_salt() -> String {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        hex::encode(salt)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(&AuthConfig::default())
    }
}
