//! Account lifecycle policy.
//!
//! The SDK's `User` only knows how to produce modified copies of itself; this
//! service decides when a change is allowed, who it is attributed to, and
//! which follow-up changes it implies (e.g. a lockout after too many failed
//! logins). Every operation takes and returns value snapshots; nothing here
//! touches storage.

use accounts_sdk::{NewUser, PasswordHash, Permission, Record, Role, User, UserPatch, UserStatus};
use time::OffsetDateTime;

use super::actor::ActorContext;
use super::error::DomainError;
use super::{guard, validation};
use crate::config::AccountsConfig;

#[derive(Debug, Clone, Default)]
pub struct AccountsService {
    config: AccountsConfig,
}

impl AccountsService {
    #[must_use]
    pub fn new(config: AccountsConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AccountsConfig {
        &self.config
    }

    /// Builds a new, unsaved user. The tenant comes from `new_user` or, if
    /// unset, from the caller's context.
    ///
    /// # Errors
    /// [`DomainError::MissingTenant`] if neither supplies a tenant,
    /// [`DomainError::Validation`] listing every invalid field.
    pub fn register_user(
        &self,
        ctx: &ActorContext,
        new_user: NewUser,
    ) -> Result<User, DomainError> {
        let NewUser {
            tenant_id,
            external_id,
            email,
            password_hash,
            first_name,
            last_name,
            display_name,
            avatar_url,
            phone,
            timezone,
            locale,
            role,
            permissions,
        } = new_user;

        let tenant_id = tenant_id
            .or_else(|| ctx.tenant_id().map(str::to_owned))
            .unwrap_or_default();

        let mut user = User::new(tenant_id, email, password_hash, first_name, last_name);
        user.external_id = external_id;
        user.display_name = display_name;
        user.avatar_url = avatar_url;
        user.phone = phone;
        user.timezone = timezone.unwrap_or_else(|| self.config.default_timezone.clone());
        user.locale = locale.unwrap_or_else(|| self.config.default_locale.clone());
        user.role = role.unwrap_or_default();
        user.permissions = permissions;
        user.record.created_by = Some(ctx.actor().to_owned());
        user.record.last_modified_by = Some(ctx.actor().to_owned());

        guard::ensure_persistable(&user)?;
        validation::validate_user(&self.config, &user)?;

        tracing::info!(
            tenant_id = %user.record.tenant_id,
            role = %user.role,
            actor = ctx.actor(),
            "Registered new user"
        );
        Ok(user)
    }

    /// # Errors
    /// [`DomainError::Validation`] if the patched record is invalid.
    pub fn update_profile(
        &self,
        ctx: &ActorContext,
        user: &User,
        patch: &UserPatch,
    ) -> Result<User, DomainError> {
        if patch.is_empty() {
            return Ok(user.clone());
        }
        let next = attribute(user.with_profile(patch), ctx);
        validation::validate_user(&self.config, &next)?;
        tracing::debug!(user_id = ?user.record.id(), "Updated user profile");
        Ok(next)
    }

    /// Final checks before a record is handed to storage.
    ///
    /// # Errors
    /// [`DomainError::MissingTenant`] or [`DomainError::Validation`].
    pub fn prepare_for_persist(&self, user: &User) -> Result<(), DomainError> {
        guard::ensure_persistable(user)?;
        validation::validate_user(&self.config, user)
    }

    /// # Errors
    /// [`DomainError::AccountUnavailable`] if the account is locked, disabled
    /// or deleted.
    #[allow(clippy::unused_self)]
    pub fn record_login(
        &self,
        ctx: &ActorContext,
        user: &User,
        ip: &str,
    ) -> Result<User, DomainError> {
        if user.is_locked() {
            tracing::warn!(user_id = ?user.record.id(), "Login attempt on locked account");
            return Err(DomainError::account_unavailable("account is locked"));
        }
        if !user.is_enabled() {
            return Err(DomainError::account_unavailable(format!(
                "account status is {}",
                user.status
            )));
        }
        Ok(attribute(user.with_last_login(ip), ctx))
    }

    /// Counts a failed login and locks the account once the configured
    /// threshold is reached.
    #[must_use]
    pub fn record_failed_login(&self, ctx: &ActorContext, user: &User) -> User {
        let mut next = user.with_failed_login();
        let threshold = self.config.max_failed_login_attempts;
        if threshold > 0 && next.failed_login_attempts >= threshold && !next.is_locked() {
            let until = OffsetDateTime::now_utc().saturating_add(self.config.lockout_duration());
            next = next.with_lock_until(Some(until));
            tracing::warn!(
                user_id = ?user.record.id(),
                tenant_id = %user.record.tenant_id,
                attempts = next.failed_login_attempts,
                "Account locked after repeated failed logins"
            );
        }
        attribute(next, ctx)
    }

    #[must_use]
    pub fn begin_password_reset(&self, ctx: &ActorContext, user: &User, token: &str) -> User {
        let expires_at =
            OffsetDateTime::now_utc().saturating_add(self.config.password_reset_ttl());
        attribute(user.with_password_reset(token, expires_at), ctx)
    }

    /// # Errors
    /// [`DomainError::InvalidToken`] if no matching, unexpired reset is
    /// pending; [`DomainError::Validation`] if the new hash is malformed.
    pub fn complete_password_reset(
        &self,
        ctx: &ActorContext,
        user: &User,
        token: &str,
        password_hash: PasswordHash,
    ) -> Result<User, DomainError> {
        if !user.is_password_reset_valid() || user.password_reset_token.as_deref() != Some(token)
        {
            return Err(DomainError::invalid_token("password reset"));
        }
        let next = attribute(
            user.with_password(password_hash).without_password_reset(),
            ctx,
        );
        validation::validate_user(&self.config, &next)?;
        tracing::info!(user_id = ?user.record.id(), "Password reset completed");
        Ok(next)
    }

    /// # Errors
    /// [`DomainError::InvalidToken`] if `token` is not the pending one.
    #[allow(clippy::unused_self)]
    pub fn verify_email(
        &self,
        ctx: &ActorContext,
        user: &User,
        token: &str,
    ) -> Result<User, DomainError> {
        if user.email_verification_token.as_deref() != Some(token) {
            return Err(DomainError::invalid_token("email verification"));
        }
        Ok(attribute(user.with_email_verified(), ctx))
    }

    #[must_use]
    pub fn needs_password_rotation(&self, user: &User) -> bool {
        user.should_update_password_after(
            self.config.password_max_age(),
            OffsetDateTime::now_utc(),
        )
    }
}

/// Administrative operations: `actor` acts on `target` and must be allowed to.
#[allow(clippy::unused_self)]
impl AccountsService {
    /// # Errors
    /// Authorization errors, or [`DomainError::NotAllowed`] if the target is
    /// already deleted or protected (super-admin / system account).
    pub fn soft_delete_user(&self, actor: &User, target: &User) -> Result<User, DomainError> {
        authorize(actor, target, Permission::UserDelete)?;
        if target.is_deleted() {
            return Err(DomainError::not_allowed("user is already deleted"));
        }
        if !target.is_deletable() {
            return Err(DomainError::not_allowed(format!(
                "{} / {} accounts cannot be deleted",
                target.role, target.status
            )));
        }
        let ctx = ActorContext::for_user(actor);
        tracing::info!(
            user_id = ?target.record.id(),
            actor = ctx.actor(),
            "Soft-deleting user"
        );
        Ok(target.soft_delete(ctx.actor()))
    }

    /// Undoes a soft delete. The account comes back `INACTIVE` and has to be
    /// re-activated explicitly.
    ///
    /// # Errors
    /// Authorization errors, or [`DomainError::NotAllowed`] if the target is
    /// not deleted.
    pub fn restore_user(&self, actor: &User, target: &User) -> Result<User, DomainError> {
        authorize(actor, target, Permission::UserUpdate)?;
        if !target.is_deleted() {
            return Err(DomainError::not_allowed("user is not deleted"));
        }
        let ctx = ActorContext::for_user(actor);
        let mut next = target.with_status(UserStatus::Inactive);
        next.record.restore(ctx.actor());
        tracing::info!(user_id = ?target.record.id(), actor = ctx.actor(), "Restored user");
        Ok(next)
    }

    /// # Errors
    /// Authorization errors, or [`DomainError::NotAllowed`] when a
    /// non-super-admin grants or revokes `SUPER_ADMIN`, or a non-admin grants
    /// or revokes `ADMIN`.
    pub fn change_role(&self, actor: &User, target: &User, role: Role) -> Result<User, DomainError> {
        authorize(actor, target, Permission::RoleAssign)?;
        let touches_super_admin = role == Role::SuperAdmin || target.role == Role::SuperAdmin;
        if touches_super_admin && actor.role != Role::SuperAdmin {
            tracing::warn!(
                actor = ?actor.record.id(),
                user_id = ?target.record.id(),
                "Rejected SUPER_ADMIN role change"
            );
            return Err(DomainError::not_allowed(
                "only a super admin may grant or revoke SUPER_ADMIN",
            ));
        }
        let touches_admin = role == Role::Admin || target.role == Role::Admin;
        if touches_admin && !actor.is_admin() {
            tracing::warn!(
                actor = ?actor.record.id(),
                user_id = ?target.record.id(),
                "Rejected ADMIN role change"
            );
            return Err(DomainError::not_allowed(
                "only an admin may grant or revoke ADMIN",
            ));
        }
        Ok(attribute(target.with_role(role), &ActorContext::for_user(actor)))
    }

    /// The actor can only hand out permissions it holds itself.
    ///
    /// # Errors
    /// Authorization errors, or [`DomainError::PermissionDenied`] naming the
    /// first permission the actor lacks.
    pub fn grant_permissions(
        &self,
        actor: &User,
        target: &User,
        permissions: &[Permission],
    ) -> Result<User, DomainError> {
        authorize(actor, target, Permission::RoleAssign)?;
        ensure_holds(actor, permissions)?;
        let mut granted = target.permissions.clone();
        granted.extend(permissions.iter().copied());
        Ok(attribute(
            target.with_permissions(granted),
            &ActorContext::for_user(actor),
        ))
    }

    /// The actor can only take away permissions it holds itself.
    ///
    /// # Errors
    /// Authorization errors, or [`DomainError::PermissionDenied`] naming the
    /// first permission the actor lacks.
    pub fn revoke_permissions(
        &self,
        actor: &User,
        target: &User,
        permissions: &[Permission],
    ) -> Result<User, DomainError> {
        authorize(actor, target, Permission::RoleAssign)?;
        ensure_holds(actor, permissions)?;
        let mut granted = target.permissions.clone();
        granted.retain(|p| !permissions.contains(p));
        Ok(attribute(
            target.with_permissions(granted),
            &ActorContext::for_user(actor),
        ))
    }
}

fn ensure_holds(actor: &User, permissions: &[Permission]) -> Result<(), DomainError> {
    match permissions.iter().copied().find(|p| !actor.has_permission(*p)) {
        Some(missing) => {
            tracing::warn!(actor = ?actor.record.id(), %missing, "Cannot delegate unheld permission");
            Err(DomainError::permission_denied(missing))
        }
        None => Ok(()),
    }
}

fn attribute(mut user: User, ctx: &ActorContext) -> User {
    user.record.last_modified_by = Some(ctx.actor().to_owned());
    user
}

fn authorize(actor: &User, target: &User, permission: Permission) -> Result<(), DomainError> {
    if !actor.is_enabled() {
        return Err(DomainError::account_unavailable("acting account is not active"));
    }
    if !actor.can_access_tenant(&target.record.tenant_id) {
        tracing::warn!(
            actor = ?actor.record.id(),
            tenant_id = %target.record.tenant_id,
            "Cross-tenant access rejected"
        );
        return Err(DomainError::tenant_access_denied(&target.record.tenant_id));
    }
    if !actor.has_permission(permission) {
        tracing::warn!(actor = ?actor.record.id(), %permission, "Permission check failed");
        return Err(DomainError::permission_denied(permission));
    }
    Ok(())
}
