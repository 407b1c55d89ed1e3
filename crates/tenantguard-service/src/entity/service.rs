//! Generic record operations governed by the permission table.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use tenantguard_auth::rbac::policy_for;
use tenantguard_auth::{AccessControl, SessionManager};
use tenantguard_core::error::AppError;
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::Clock;
use tenantguard_core::types::{Predicates, SortField};
use tenantguard_entity::{
    Action, EntityType, Organization, Record, Role, User, backfill_organization, from_record,
    new_id, str_field,
};
use tenantguard_store::{DocumentStore, StoreDocument};

use crate::context::RequestContext;

/// Fields never exposed by, nor accepted through, the entity surface.
const CREDENTIAL_FIELDS: [&str; 2] = ["passwordHash", "passwordSalt"];

/// Fields fixed at creation.
const IMMUTABLE_FIELDS: [&str; 2] = ["id", "created_date"];

/// Applies access control, scoping, and ordering to raw records.
#[derive(Debug, Clone)]
pub struct EntityService {
    store: Arc<DocumentStore>,
    clock: Arc<dyn Clock>,
    sessions: Arc<SessionManager>,
    access: AccessControl,
}

impl EntityService {
    /// Creates a new entity service.
    pub fn new(
        store: Arc<DocumentStore>,
        clock: Arc<dyn Clock>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            store,
            clock,
            sessions,
            access: AccessControl::new(),
        }
    }

    async fn context(&self) -> AppResult<RequestContext> {
        RequestContext::resolve(&self.sessions, &self.store, self.clock.as_ref()).await
    }

    /// Records of `entity_type` visible to the caller that match
    /// `predicates`, sorted then truncated. A caller without read permission
    /// gets an empty list.
    pub async fn query(
        &self,
        entity_type: EntityType,
        predicates: Option<&Predicates>,
        sort: Option<&SortField>,
        limit: Option<usize>,
    ) -> AppResult<Vec<Record>> {
        let ctx = self.context().await?;
        if !self
            .access
            .can_perform(&ctx.identity, entity_type, Action::Read, None)
        {
            debug!(entity = %entity_type, role = %ctx.identity.role, "Read denied; returning nothing");
            return Ok(Vec::new());
        }

        let records = self
            .store
            .read(|doc| {
                doc.records(entity_type)
                    .iter()
                    .filter(|r| predicates.is_none_or(|p| p.matches(r)))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await?;

        let mut records = self.access.scope_to_org(&ctx.identity, entity_type, records);
        if let Some(sort) = sort {
            sort.sort(&mut records);
        }
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        if entity_type == EntityType::User {
            records.iter_mut().for_each(strip_credentials);
        }
        Ok(records)
    }

    /// Insert a record built from `fields`.
    ///
    /// `id` and `created_date` are always assigned here; `orgId` and the
    /// type's owner field default to the caller's.
    pub async fn create(&self, entity_type: EntityType, mut fields: Record) -> AppResult<Record> {
        let ctx = self.context().await?;
        self.access
            .require(&ctx.identity, entity_type, Action::Create, None)?;

        strip_credentials(&mut fields);
        fields.insert("id".into(), Value::String(new_id()));
        fields.insert(
            "created_date".into(),
            serde_json::to_value(ctx.request_time)?,
        );
        if entity_type.is_org_scoped()
            && !fields.contains_key("orgId")
            && let Some(org_id) = ctx.org_id()
        {
            fields.insert("orgId".into(), Value::String(org_id.to_string()));
        }
        if let Some(owner_field) = policy_for(entity_type).owner_field
            && !fields.contains_key(owner_field)
            && !ctx.identity.is_guest()
        {
            fields.insert(owner_field.into(), Value::String(ctx.identity.email.clone()));
        }
        if entity_type == EntityType::Organization {
            backfill_organization(&mut fields);
        }
        if entity_type == EntityType::User {
            trim_email(&mut fields);
            check_role_change(&ctx, None, &fields)?;
        }

        self.access
            .require(&ctx.identity, entity_type, Action::Create, Some(&fields))?;

        let record = fields.clone();
        self.store
            .mutate(|doc| {
                validate_shape(entity_type, &record)?;
                if entity_type == EntityType::User {
                    ensure_unique_email(doc, &record)?;
                }
                doc.insert(entity_type, record);
                Ok(())
            })
            .await?;

        info!(entity = %entity_type, id = ?str_field(&fields, "id"), actor = %ctx.identity.email, "Record created");
        if entity_type == EntityType::User {
            strip_credentials(&mut fields);
        }
        Ok(fields)
    }

    /// Merge `partial` into the record with `id`.
    ///
    /// `id` and `created_date` cannot be changed. The caller must be allowed
    /// to update the record both as stored and as merged, so a member cannot
    /// move a record out of their organization or hand it to someone else.
    pub async fn update(
        &self,
        entity_type: EntityType,
        id: &str,
        mut partial: Record,
    ) -> AppResult<Record> {
        let ctx = self.context().await?;
        strip_credentials(&mut partial);
        for field in IMMUTABLE_FIELDS {
            partial.remove(field);
        }
        if entity_type == EntityType::User {
            trim_email(&mut partial);
        }

        let mut updated = self
            .store
            .mutate(|doc| {
                let record = doc
                    .find(entity_type, id)
                    .ok_or_else(|| AppError::not_found(format!("{entity_type} '{id}' not found")))?;
                self.access
                    .require(&ctx.identity, entity_type, Action::Update, Some(record))?;
                if entity_type == EntityType::User {
                    check_role_change(&ctx, Some(record), &partial)?;
                }

                let mut merged = record.clone();
                merged.extend(partial);
                if entity_type == EntityType::Organization {
                    backfill_organization(&mut merged);
                }
                self.access
                    .require(&ctx.identity, entity_type, Action::Update, Some(&merged))?;
                validate_shape(entity_type, &merged)?;
                if entity_type == EntityType::User {
                    ensure_unique_email(doc, &merged)?;
                }

                let slot = doc
                    .find_mut(entity_type, id)
                    .ok_or_else(|| AppError::not_found(format!("{entity_type} '{id}' not found")))?;
                *slot = merged.clone();
                Ok(merged)
            })
            .await?;

        info!(entity = %entity_type, id = %id, actor = %ctx.identity.email, "Record updated");
        if entity_type == EntityType::User {
            strip_credentials(&mut updated);
        }
        Ok(updated)
    }

    /// Remove the record with `id`.
    pub async fn delete(&self, entity_type: EntityType, id: &str) -> AppResult<()> {
        let ctx = self.context().await?;
        self.store
            .mutate(|doc| {
                let record = doc
                    .find(entity_type, id)
                    .ok_or_else(|| AppError::not_found(format!("{entity_type} '{id}' not found")))?;
                self.access
                    .require(&ctx.identity, entity_type, Action::Delete, Some(record))?;
                doc.remove(entity_type, id);
                Ok(())
            })
            .await?;

        info!(entity = %entity_type, id = %id, actor = %ctx.identity.email, "Record deleted");
        Ok(())
    }
}

fn strip_credentials(record: &mut Record) {
    for field in CREDENTIAL_FIELDS {
        record.remove(field);
    }
}

/// Role changes through the entity surface follow the same rule as role
/// assignment: only an owner may grant a privileged role or change the role
/// of an account that currently holds one.
fn check_role_change(
    ctx: &RequestContext,
    current: Option<&Record>,
    fields: &Record,
) -> AppResult<()> {
    let Some(role) = str_field(fields, "role") else {
        return Ok(());
    };
    let role: Role = role.parse()?;
    if ctx.is_owner() {
        return Ok(());
    }
    if role.is_privileged() {
        return Err(AppError::permission_denied(format!(
            "Only an owner can grant the '{role}' role"
        )));
    }
    let current = current
        .and_then(|r| str_field(r, "role"))
        .and_then(|r| r.parse::<Role>().ok());
    if let Some(current) = current
        && current.is_privileged()
        && current != role
    {
        return Err(AppError::permission_denied(format!(
            "Only an owner can change the role of an {current}"
        )));
    }
    Ok(())
}

/// Reject records the typed views could not read back, so a bad write
/// never reaches the store.
fn validate_shape(entity_type: EntityType, record: &Record) -> AppResult<()> {
    let result = match entity_type {
        EntityType::Organization => from_record::<Organization>(record).map(drop),
        EntityType::User => from_record::<User>(record).map(drop),
        _ => Ok(()),
    };
    result.map_err(|e| {
        AppError::validation(format!("Invalid {entity_type} record: {}", e.message))
    })
}

fn trim_email(fields: &mut Record) {
    if let Some(Value::String(email)) = fields.get_mut("email") {
        *email = email.trim().to_string();
    }
}

/// Emails are unique across users, compared case-insensitively.
fn ensure_unique_email(doc: &StoreDocument, record: &Record) -> AppResult<()> {
    let Some(email) = str_field(record, "email") else {
        return Ok(());
    };
    let id = str_field(record, "id");
    let taken = doc.records(EntityType::User).iter().any(|other| {
        str_field(other, "id") != id
            && str_field(other, "email").is_some_and(|e| e.trim().eq_ignore_ascii_case(email))
    });
    if taken {
        return Err(AppError::conflict(format!(
            "A user with email '{email}' already exists"
        )));
    }
    Ok(())
}
