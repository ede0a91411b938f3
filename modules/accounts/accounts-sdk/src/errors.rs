//! Public error types for the `accounts` module.
//!
//! These errors are safe to expose to other modules and consumers.

use thiserror::Error;

/// Errors that can be returned by the accounts module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountsError {
    /// The caller tried to persist a record without a tenant.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Validation error with the provided data.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The acting user is not allowed to perform the operation.
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// The operation conflicts with the current state of the record.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// An internal error occurred.
    #[error("Internal error")]
    Internal,
}

impl AccountsError {
    /// Create a `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a `Forbidden` error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an `Internal` error.
    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
