use std::fmt;
use std::str::FromStr;

use super::UnknownVariant;

/// Coarse-grained role of a user inside its tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
    SuperAdmin,
    Manager,
    Analyst,
    Developer,
    Viewer,
}

impl Role {
    pub const ALL: [Self; 7] = [
        Self::User,
        Self::Admin,
        Self::SuperAdmin,
        Self::Manager,
        Self::Analyst,
        Self::Developer,
        Self::Viewer,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Manager => "MANAGER",
            Self::Analyst => "ANALYST",
            Self::Developer => "DEVELOPER",
            Self::Viewer => "VIEWER",
        }
    }

    /// Authority string used by access-control checks, e.g. `ROLE_ADMIN`.
    #[must_use]
    pub fn authority(self) -> String {
        format!("ROLE_{}", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("role", s))
    }
}

/// Account status. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Pending,
    Suspended,
    Deleted,
    /// Accounts owned by the platform itself; never deletable.
    System,
}

impl UserStatus {
    pub const ALL: [Self; 6] = [
        Self::Active,
        Self::Inactive,
        Self::Pending,
        Self::Suspended,
        Self::Deleted,
        Self::System,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Pending => "PENDING",
            Self::Suspended => "SUSPENDED",
            Self::Deleted => "DELETED",
            Self::System => "SYSTEM",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("status", s))
    }
}
