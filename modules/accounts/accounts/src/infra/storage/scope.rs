//! Row filters for `users` queries and writes.
//!
//! Callers pass the tenant scope explicitly; nothing here consults a
//! request-global tenant.

use accounts_sdk::TenantScope;
use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use super::entity::user;

/// Row filter for `scope`. [`TenantScope::AllTenants`] yields an empty
/// condition.
#[must_use]
pub fn tenant_condition(scope: &TenantScope) -> Condition {
    match scope.tenant_id() {
        Some(tenant_id) => Condition::all().add(user::Column::TenantId.eq(tenant_id)),
        None => Condition::all(),
    }
}

/// Rows that would collide with `email` inside `tenant_id`. Soft-deleted rows
/// still hold their email.
#[must_use]
pub fn email_uniqueness_condition(tenant_id: &str, email: &str) -> Condition {
    Condition::all()
        .add(user::Column::TenantId.eq(tenant_id))
        .add(user::Column::Email.eq(email))
}

/// Matches row `id` only while it still carries `expected_version`. An update
/// filtered by this condition affects no rows if another writer got there
/// first.
#[must_use]
pub fn version_condition(id: Uuid, expected_version: i64) -> Condition {
    Condition::all()
        .add(user::Column::Id.eq(id))
        .add(user::Column::Version.eq(expected_version))
}
