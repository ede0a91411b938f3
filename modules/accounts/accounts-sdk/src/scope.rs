/// Tenant filter that every read and write against account records is bound to.
///
/// The scope is always passed explicitly; there is no ambient "current tenant".
/// `AllTenants` is only ever produced for super-admins and disables tenant
/// isolation for that caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TenantScope {
    /// Rows belonging to exactly one tenant.
    Tenant(String),
    /// Rows of every tenant.
    AllTenants,
}

impl TenantScope {
    #[must_use]
    pub fn tenant(tenant_id: impl Into<String>) -> Self {
        Self::Tenant(tenant_id.into())
    }

    #[must_use]
    pub fn all_tenants() -> Self {
        Self::AllTenants
    }

    /// Returns true if rows of `tenant_id` are visible through this scope.
    #[must_use]
    pub fn admits(&self, tenant_id: &str) -> bool {
        match self {
            Self::Tenant(own) => own == tenant_id,
            Self::AllTenants => true,
        }
    }

    /// The single tenant this scope is bound to, `None` for `AllTenants`.
    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            Self::Tenant(own) => Some(own),
            Self::AllTenants => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::AllTenants)
    }
}
