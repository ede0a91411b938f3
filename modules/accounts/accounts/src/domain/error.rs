use accounts_sdk::{AccountsError, Permission};
use thiserror::Error;

use super::validation::FieldViolation;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Fail-safe: a record reached persistence without a tenant. This points
    /// at a misconfigured caller and is never retried.
    #[error("{kind} cannot be persisted without a tenant id")]
    MissingTenant { kind: &'static str },

    #[error("Validation failed: {}", summarize(.violations))]
    Validation { violations: Vec<FieldViolation> },

    #[error("Permission denied: {permission} is required")]
    PermissionDenied { permission: Permission },

    #[error("Access to tenant '{tenant_id}' denied")]
    TenantAccessDenied { tenant_id: String },

    #[error("Operation not allowed: {reason}")]
    NotAllowed { reason: String },

    #[error("Account unavailable: {reason}")]
    AccountUnavailable { reason: String },

    #[error("Invalid or expired {kind} token")]
    InvalidToken { kind: &'static str },

    /// The stored row no longer carries the version the writer loaded.
    #[error("Record was modified concurrently (expected version {expected})")]
    StaleVersion { expected: i64 },

    #[error("Storage mapping error: {message}")]
    Storage { message: String },
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    #[must_use]
    pub fn missing_tenant(kind: &'static str) -> Self {
        Self::MissingTenant { kind }
    }

    #[must_use]
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    #[must_use]
    pub fn permission_denied(permission: Permission) -> Self {
        Self::PermissionDenied { permission }
    }

    #[must_use]
    pub fn tenant_access_denied(tenant_id: impl Into<String>) -> Self {
        Self::TenantAccessDenied {
            tenant_id: tenant_id.into(),
        }
    }

    #[must_use]
    pub fn not_allowed(reason: impl Into<String>) -> Self {
        Self::NotAllowed {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn account_unavailable(reason: impl Into<String>) -> Self {
        Self::AccountUnavailable {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn invalid_token(kind: &'static str) -> Self {
        Self::InvalidToken { kind }
    }

    #[must_use]
    pub fn stale_version(expected: i64) -> Self {
        Self::StaleVersion { expected }
    }

    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Violations carried by a validation error, empty for every other variant.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation { violations } => violations,
            _ => &[],
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for AccountsError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::MissingTenant { .. } => AccountsError::configuration(e.to_string()),
            DomainError::Validation { ref violations } => {
                AccountsError::validation(summarize(violations))
            }
            DomainError::PermissionDenied { .. } | DomainError::TenantAccessDenied { .. } => {
                AccountsError::forbidden(e.to_string())
            }
            DomainError::NotAllowed { reason } | DomainError::AccountUnavailable { reason } => {
                AccountsError::conflict(reason)
            }
            DomainError::InvalidToken { .. } => AccountsError::validation(e.to_string()),
            DomainError::StaleVersion { .. } => AccountsError::conflict(e.to_string()),
            DomainError::Storage { .. } => AccountsError::internal(),
        }
    }
}
