//! Bookkeeping rows in the `Session` collection.
//!
//! One row per user, refreshed on login and touch and marked ended on
//! logout. These rows never authenticate anyone.

use chrono::{DateTime, Utc};

use tenantguard_core::result::AppResult;
use tenantguard_entity::{EntityType, SessionRecord, SessionStatus, User, new_id};
use tenantguard_store::StoreDocument;

/// Upsert the user's row as active until `expires_at`.
///
/// `new_session` resets `startedAt` (a login); otherwise only activity and
/// expiry move (a touch).
pub fn record_session_started(
    doc: &mut StoreDocument,
    user: &User,
    now: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    new_session: bool,
) -> AppResult<SessionRecord> {
    let existing = doc
        .typed::<SessionRecord>(EntityType::Session)
        .into_iter()
        .find(|row| row.user_id == user.id);

    let row = match existing {
        Some(mut row) => {
            row.user_email = user.email.clone();
            row.org_id = user.org_id.clone();
            row.refresh(now, expires_at, new_session);
            row
        }
        None => SessionRecord {
            id: new_id(),
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            org_id: user.org_id.clone(),
            status: SessionStatus::Active,
            started_at: now,
            last_seen_at: now,
            expires_at,
            ended_at: None,
            created_date: now,
        },
    };

    doc.upsert(EntityType::Session, &row)?;
    Ok(row)
}

/// Mark the user's row ended, if there is one.
pub fn record_session_ended(
    doc: &mut StoreDocument,
    user_id: &str,
    now: DateTime<Utc>,
) -> AppResult<Option<SessionRecord>> {
    let Some(mut row) = doc
        .typed::<SessionRecord>(EntityType::Session)
        .into_iter()
        .find(|row| row.user_id == user_id)
    else {
        return Ok(None);
    };

    row.end(now);
    doc.upsert(EntityType::Session, &row)?;
    Ok(Some(row))
}
