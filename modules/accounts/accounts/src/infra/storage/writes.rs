//! Optimistically locked writes to `users`.

use accounts_sdk::{TenantScope, User};
use sea_orm::{ConnectionTrait, EntityTrait, QueryFilter};
use time::OffsetDateTime;

use super::entity::user;
use super::mapper::to_active_model;
use super::scope::{tenant_condition, version_condition};
use crate::domain::error::DomainError;
use crate::domain::guard;

/// Writes `u` back over the row it was loaded from.
///
/// The update only applies while the row still carries `u.record.version`
/// and lies inside `scope`; on success the returned snapshot carries the
/// bumped version.
///
/// # Errors
/// - [`DomainError::NotAllowed`] if `u` was never persisted
/// - [`DomainError::TenantAccessDenied`] if `scope` does not admit the tenant
/// - [`DomainError::StaleVersion`] if another writer updated the row first
/// - [`DomainError::Storage`] on mapping or database failures
pub async fn update_user<C>(db: &C, scope: &TenantScope, u: &User) -> Result<User, DomainError>
where
    C: ConnectionTrait,
{
    let Some(id) = u.record.id() else {
        return Err(DomainError::not_allowed("user has not been persisted yet"));
    };
    if !scope.admits(&u.record.tenant_id) {
        return Err(DomainError::tenant_access_denied(&u.record.tenant_id));
    }
    guard::ensure_persistable(u)?;

    let expected = u.record.version;
    let now = OffsetDateTime::now_utc();
    let am = to_active_model(u)?
        .stamp(false, now)
        .map_err(|e| DomainError::storage(e.to_string()))?;

    let result = user::Entity::update_many()
        .set(am)
        .filter(version_condition(id, expected))
        .filter(tenant_condition(scope))
        .exec(db)
        .await
        .map_err(|e| DomainError::storage(e.to_string()))?;

    if result.rows_affected == 0 {
        tracing::warn!(user_id = %id, expected, "Rejected stale user write");
        return Err(DomainError::stale_version(expected));
    }

    let mut next = u.clone();
    next.record.version = expected.saturating_add(1);
    next.record.updated_at = now;
    tracing::debug!(user_id = %id, version = next.record.version, "Updated user row");
    Ok(next)
}
