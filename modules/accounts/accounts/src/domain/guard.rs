//! Pre-persist guard.
//!
//! Tenant assignment is the caller's job (see [`ActorContext`]); this guard
//! only refuses to let an unassigned record reach storage.
//!
//! [`ActorContext`]: super::actor::ActorContext

use accounts_sdk::Record;

use super::error::DomainError;

/// Fails if `tenant_id` is blank.
///
/// # Errors
/// Returns [`DomainError::MissingTenant`] naming `kind`.
pub fn ensure_tenant_assigned(kind: &'static str, tenant_id: &str) -> Result<(), DomainError> {
    if tenant_id.trim().is_empty() {
        tracing::error!(kind, "refusing to persist record without tenant id");
        return Err(DomainError::missing_tenant(kind));
    }
    Ok(())
}

/// Runs the pre-persist checks for any record type.
///
/// # Errors
/// Returns [`DomainError::MissingTenant`] if the record has no tenant.
pub fn ensure_persistable<R: Record + ?Sized>(record: &R) -> Result<(), DomainError> {
    ensure_tenant_assigned(record.record_kind(), record.tenant_id())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use accounts_sdk::{PasswordHash, RecordEnvelope, User};

    #[test]
    fn blank_tenant_is_rejected() {
        assert_eq!(
            ensure_persistable(&RecordEnvelope::new("")),
            Err(DomainError::missing_tenant("record"))
        );
        assert_eq!(
            ensure_persistable(&RecordEnvelope::new(" \t")),
            Err(DomainError::missing_tenant("record"))
        );
    }

    #[test]
    fn user_kind_is_reported() {
        let u = User::new("", "a@b.co", PasswordHash::new(""), "A", "B");
        assert_eq!(
            ensure_persistable(&u),
            Err(DomainError::missing_tenant("user"))
        );
    }

    #[test]
    fn assigned_tenant_passes() {
        assert_eq!(ensure_persistable(&RecordEnvelope::new("acme")), Ok(()));
    }
}
