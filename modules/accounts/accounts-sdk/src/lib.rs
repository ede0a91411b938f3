//! Accounts SDK
//!
//! This crate provides the public contract of the `accounts` module:
//!
//! - [`RecordEnvelope`] and the [`Record`] capability trait - identity, tenant
//!   tag, soft-delete state, audit stamps and optimistic-lock version shared by
//!   every persisted record
//! - [`User`] - the tenant-scoped user record with its derived properties,
//!   authorization queries and copy-on-write helpers
//! - [`Role`], [`UserStatus`], [`Permission`] - closed enumerations
//! - [`TenantScope`] - explicit tenant filter threaded through every query
//! - [`AccountsError`] - error type safe to expose to consumers
//!
//! ## Usage
//!
//! ```ignore
//! use accounts_sdk::{Permission, Role, User};
//!
//! let user = User::new("acme", "ada@acme.io", hash, "Ada", "Lovelace")
//!     .with_role(Role::Manager);
//!
//! assert!(user.can_access_tenant("acme"));
//! assert!(!user.has_permission(Permission::BillingManage));
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod errors;
pub mod models;
pub mod scope;

pub use errors::AccountsError;
pub use models::{
    IdAlreadyAssigned, NewUser, PasswordHash, Permission, Record, RecordEnvelope, Role,
    UnknownVariant, User, UserPatch, UserStatus,
};
pub use scope::TenantScope;
