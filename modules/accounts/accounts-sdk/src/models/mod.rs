//! Public models for the accounts module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the accounts module and its consumers.

mod password;
mod permission;
mod record;
mod role;
mod user;

pub use password::PasswordHash;
pub use permission::Permission;
pub use record::{IdAlreadyAssigned, Record, RecordEnvelope};
pub use role::{Role, UserStatus};
pub use user::{NewUser, User, UserPatch, DEFAULT_LOCALE, DEFAULT_TIMEZONE, PASSWORD_MAX_AGE};

use thiserror::Error;

/// Returned when a stored or transmitted name does not match any member of a
/// closed enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
