//! Accounts Module Implementation
//!
//! The public contract is defined in `accounts-sdk` and re-exported here.
//! This crate adds what the contract leaves to collaborators: field
//! validation, actor attribution, the account lifecycle policy, the
//! pre-persist tenant guard, and the `SeaORM` mapping of the `users` table.

pub use accounts_sdk::{
    AccountsError, NewUser, PasswordHash, Permission, Record, RecordEnvelope, Role, TenantScope,
    User, UserPatch, UserStatus,
};

pub mod config;
pub use config::AccountsConfig;

pub mod domain;
pub use domain::actor::ActorContext;
pub use domain::error::DomainError;
pub use domain::service::AccountsService;

pub mod infra;

mod humantime_serde;
