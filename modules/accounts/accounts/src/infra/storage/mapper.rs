//! Entity to domain model mappers.

use std::collections::BTreeSet;

use accounts_sdk::{PasswordHash, Permission, RecordEnvelope, UnknownVariant, User};
use sea_orm::ActiveValue::{Set, Unchanged};
use thiserror::Error;
use uuid::Uuid;

use super::entity::user;
use crate::domain::error::DomainError;

/// A stored row that cannot be represented as a domain value, or the reverse.
#[derive(Error, Debug)]
pub enum MapperError {
    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),

    #[error("{field} out of range: {value}")]
    CounterOutOfRange { field: &'static str, value: i64 },

    #[error("invalid permissions column: {0}")]
    Permissions(#[from] serde_json::Error),
}

impl From<MapperError> for DomainError {
    fn from(e: MapperError) -> Self {
        tracing::error!(error = %e, "User row mapping failed");
        DomainError::storage(e.to_string())
    }
}

fn counter(field: &'static str, value: i64) -> Result<u32, MapperError> {
    u32::try_from(value).map_err(|_| MapperError::CounterOutOfRange { field, value })
}

fn decode_permissions(raw: &str) -> Result<BTreeSet<Permission>, MapperError> {
    let names: Vec<String> = serde_json::from_str(raw)?;
    names
        .iter()
        .map(|n| n.parse::<Permission>().map_err(MapperError::from))
        .collect()
}

fn encode_permissions(permissions: &BTreeSet<Permission>) -> Result<String, MapperError> {
    let names: Vec<&str> = permissions.iter().map(|p| p.as_str()).collect();
    Ok(serde_json::to_string(&names)?)
}

/// Convert user entity to domain model.
impl TryFrom<user::Model> for User {
    type Error = MapperError;

    fn try_from(model: user::Model) -> Result<Self, Self::Error> {
        let mut record = RecordEnvelope::persisted(model.id, model.tenant_id, model.created_at);
        record.deleted_at = model.deleted_at;
        record.deleted_by = model.deleted_by;
        record.updated_at = model.updated_at;
        record.created_by = model.created_by;
        record.last_modified_by = model.last_modified_by;
        record.version = model.version;
        record.metadata = model.metadata;

        Ok(Self {
            record,
            external_id: model.external_id,
            email: model.email,
            password_hash: PasswordHash::new(model.password_hash),
            password_reset_token: model.password_reset_token,
            password_reset_expires_at: model.password_reset_expires_at,
            email_verification_token: model.email_verification_token,
            email_verified_at: model.email_verified_at,
            first_name: model.first_name,
            last_name: model.last_name,
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            phone: model.phone,
            timezone: model.timezone,
            locale: model.locale,
            role: model.role.parse()?,
            status: model.status.parse()?,
            permissions: decode_permissions(&model.permissions)?,
            last_login_at: model.last_login_at,
            last_login_ip: model.last_login_ip,
            login_count: counter("login_count", model.login_count)?,
            failed_login_attempts: counter("failed_login_attempts", model.failed_login_attempts)?,
            account_locked_until: model.account_locked_until,
            preferences: model.preferences,
            notes: model.notes,
        })
    }
}

/// Convert a user to an active model ready for saving.
///
/// A user that was never persisted gets a fresh time-ordered id; otherwise
/// the id is kept as the update key.
///
/// # Errors
/// Returns [`MapperError::Permissions`] if the permission set cannot be
/// serialized.
pub fn to_active_model(u: &User) -> Result<user::ActiveModel, MapperError> {
    let id = match u.record.id() {
        Some(id) => Unchanged(id),
        None => Set(Uuid::now_v7()),
    };
    let r = &u.record;

    Ok(user::ActiveModel {
        id,
        tenant_id: Set(r.tenant_id.clone()),
        external_id: Set(u.external_id.clone()),
        email: Set(u.email.clone()),
        password_hash: Set(u.password_hash.expose().to_owned()),
        password_reset_token: Set(u.password_reset_token.clone()),
        password_reset_expires_at: Set(u.password_reset_expires_at),
        email_verification_token: Set(u.email_verification_token.clone()),
        email_verified_at: Set(u.email_verified_at),
        first_name: Set(u.first_name.clone()),
        last_name: Set(u.last_name.clone()),
        display_name: Set(u.display_name.clone()),
        avatar_url: Set(u.avatar_url.clone()),
        phone: Set(u.phone.clone()),
        timezone: Set(u.timezone.clone()),
        locale: Set(u.locale.clone()),
        role: Set(u.role.as_str().to_owned()),
        status: Set(u.status.as_str().to_owned()),
        permissions: Set(encode_permissions(&u.permissions)?),
        last_login_at: Set(u.last_login_at),
        last_login_ip: Set(u.last_login_ip.clone()),
        login_count: Set(i64::from(u.login_count)),
        failed_login_attempts: Set(i64::from(u.failed_login_attempts)),
        account_locked_until: Set(u.account_locked_until),
        metadata: Set(r.metadata.clone()),
        preferences: Set(u.preferences.clone()),
        notes: Set(u.notes.clone()),
        deleted: Set(r.is_deleted()),
        deleted_at: Set(r.deleted_at),
        deleted_by: Set(r.deleted_by.clone()),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
        created_by: Set(r.created_by.clone()),
        last_modified_by: Set(r.last_modified_by.clone()),
        version: Unchanged(r.version),
    })
}
