use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Hashed credential of a user.
///
/// `Debug` and `Display` both print `[REDACTED]`; the hash only leaves this
/// type through [`expose`](Self::expose). The backing buffer is zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read-only access to the stored hash, for the credential verifier and
    /// the storage mapper only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Length in characters, as checked by validation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Clone for PasswordHash {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl PartialEq for PasswordHash {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for PasswordHash {}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
