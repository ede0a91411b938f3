use accounts_sdk::User;

/// Actor name used for changes made by the platform itself.
pub const SYSTEM_ACTOR: &str = "system";

/// Identity of whoever is performing an operation, supplied by the caller.
///
/// Provides the attribution written to `created_by` / `last_modified_by` and
/// the tenant new records fall back to. It is always passed explicitly; the
/// module never reads an ambient "current user".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    tenant_id: Option<String>,
    actor: String,
}

impl ActorContext {
    #[must_use]
    pub fn builder() -> ActorContextBuilder {
        ActorContextBuilder::default()
    }

    /// Context for platform-initiated changes; carries no tenant.
    #[must_use]
    pub fn system() -> Self {
        Self {
            tenant_id: None,
            actor: SYSTEM_ACTOR.to_owned(),
        }
    }

    /// Context for changes made by an authenticated user, attributed to the
    /// user's id when persisted, otherwise to its email.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self {
            tenant_id: Some(user.record.tenant_id.clone()),
            actor: user
                .record
                .id()
                .map_or_else(|| user.email.clone(), |id| id.to_string()),
        }
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }
}

#[derive(Default)]
pub struct ActorContextBuilder {
    tenant_id: Option<String>,
    actor: Option<String>,
}

impl ActorContextBuilder {
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: &str) -> Self {
        self.tenant_id = Some(tenant_id.to_owned());
        self
    }

    #[must_use]
    pub fn actor(mut self, actor: &str) -> Self {
        self.actor = Some(actor.to_owned());
        self
    }

    /// Missing actor falls back to [`SYSTEM_ACTOR`].
    #[must_use]
    pub fn build(self) -> ActorContext {
        ActorContext {
            tenant_id: self.tenant_id,
            actor: self.actor.unwrap_or_else(|| SYSTEM_ACTOR.to_owned()),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use accounts_sdk::PasswordHash;
    use uuid::Uuid;

    #[test]
    fn builder_defaults_to_system_actor() {
        let ctx = ActorContext::builder().tenant_id("acme").build();
        assert_eq!(ctx.actor(), "system");
        assert_eq!(ctx.tenant_id(), Some("acme"));
        assert_eq!(ActorContext::system().tenant_id(), None);
    }

    #[test]
    fn user_context_prefers_id_over_email() {
        let mut u = User::new("acme", "ada@acme.io", PasswordHash::new(""), "Ada", "L");
        assert_eq!(ActorContext::for_user(&u).actor(), "ada@acme.io");

        let id = Uuid::new_v4();
        u.record.assign_id(id).unwrap();
        let ctx = ActorContext::for_user(&u);
        assert_eq!(ctx.actor(), id.to_string());
        assert_eq!(ctx.tenant_id(), Some("acme"));
    }
}
