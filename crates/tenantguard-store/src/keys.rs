//! Storage keys for every value TenantGuard persists.
//!
//! Centralising key names keeps the persisted layout in one place.

/// Prefix applied to all TenantGuard storage keys.
const PREFIX: &str = "tenantguard";

/// Schema version embedded in the document key and stamped into
/// `meta.version`. Bumping it discards and reseeds existing documents.
pub const SCHEMA_VERSION: u32 = 1;

/// Key holding the store document.
pub fn document() -> String {
    format!("{PREFIX}.db.v{SCHEMA_VERSION}")
}

/// Key holding the signed live-session token.
pub fn session() -> String {
    format!("{PREFIX}.session")
}

/// Key holding the global login-attempt counter.
pub fn login_attempts() -> String {
    format!("{PREFIX}.login_attempts")
}
