use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use time::{Duration, OffsetDateTime};

use super::{PasswordHash, Permission, Record, RecordEnvelope, Role, UserStatus};
use crate::scope::TenantScope;

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_LOCALE: &str = "en";

/// Age after which a password is due for rotation.
pub const PASSWORD_MAX_AGE: Duration = Duration::days(90);

/// A tenant-scoped user account.
///
/// Users are value snapshots: every `with_*` helper returns a modified copy
/// with `updated_at` refreshed and leaves the receiver untouched. Users are
/// never hard-deleted, only soft-deleted through [`User::soft_delete`].
#[derive(Clone)]
pub struct User {
    pub record: RecordEnvelope,
    pub external_id: Option<String>,

    pub email: String,
    pub password_hash: PasswordHash,
    pub password_reset_token: Option<String>,
    pub password_reset_expires_at: Option<OffsetDateTime>,
    pub email_verification_token: Option<String>,
    pub email_verified_at: Option<OffsetDateTime>,

    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub timezone: String,
    pub locale: String,

    pub role: Role,
    pub status: UserStatus,
    pub permissions: BTreeSet<Permission>,

    pub last_login_at: Option<OffsetDateTime>,
    pub last_login_ip: Option<String>,
    pub login_count: u32,
    pub failed_login_attempts: u32,
    pub account_locked_until: Option<OffsetDateTime>,

    pub preferences: Option<String>,
    pub notes: Option<String>,
}

/// Data for registering a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Falls back to the caller's tenant when unset.
    pub tenant_id: Option<String>,
    pub external_id: Option<String>,
    pub email: String,
    pub password_hash: PasswordHash,
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub timezone: Option<String>,
    pub locale: Option<String>,
    pub role: Option<Role>,
    pub permissions: BTreeSet<Permission>,
}

impl NewUser {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password_hash: PasswordHash,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: None,
            external_id: None,
            email: email.into(),
            password_hash,
            first_name: first_name.into(),
            last_name: last_name.into(),
            display_name: None,
            avatar_url: None,
            phone: None,
            timezone: None,
            locale: None,
            role: None,
            permissions: BTreeSet::new(),
        }
    }
}

/// Partial update of profile fields. `None` leaves the field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub timezone: Option<String>,
    pub locale: Option<String>,
}

impl UserPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl User {
    /// Creates an unsaved active user with role `USER`, no permissions and
    /// zeroed counters.
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        email: impl Into<String>,
        password_hash: PasswordHash,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            record: RecordEnvelope::new(tenant_id),
            external_id: None,
            email: email.into(),
            password_hash,
            password_reset_token: None,
            password_reset_expires_at: None,
            email_verification_token: None,
            email_verified_at: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            display_name: None,
            avatar_url: None,
            phone: None,
            timezone: DEFAULT_TIMEZONE.to_owned(),
            locale: DEFAULT_LOCALE.to_owned(),
            role: Role::User,
            status: UserStatus::Active,
            permissions: BTreeSet::new(),
            last_login_at: None,
            last_login_ip: None,
            login_count: 0,
            failed_login_attempts: 0,
            account_locked_until: None,
            preferences: None,
            notes: None,
        }
    }

    // ---- derived properties ----

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[must_use]
    pub fn display_name_or_full_name(&self) -> Cow<'_, str> {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => Cow::Borrowed(name),
            _ => Cow::Owned(self.full_name()),
        }
    }

    #[must_use]
    pub fn is_email_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    #[must_use]
    pub fn is_password_reset_valid(&self) -> bool {
        self.is_password_reset_valid_at(OffsetDateTime::now_utc())
    }

    #[must_use]
    pub fn is_password_reset_valid_at(&self, now: OffsetDateTime) -> bool {
        self.password_reset_token.is_some()
            && self.password_reset_expires_at.is_some_and(|exp| exp > now)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin | Role::SuperAdmin)
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.is_locked_at(OffsetDateTime::now_utc())
    }

    #[must_use]
    pub fn is_locked_at(&self, now: OffsetDateTime) -> bool {
        self.account_locked_until.is_some_and(|until| until > now)
    }

    #[must_use]
    pub fn is_deletable(&self) -> bool {
        self.role != Role::SuperAdmin && self.status != UserStatus::System
    }

    #[must_use]
    pub fn is_account_non_expired(&self) -> bool {
        self.record.deleted_at.is_none()
    }

    #[must_use]
    pub fn is_account_non_locked(&self) -> bool {
        !self.is_locked()
    }

    #[must_use]
    pub fn is_account_non_locked_at(&self, now: OffsetDateTime) -> bool {
        !self.is_locked_at(now)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.status == UserStatus::Active && self.record.deleted_at.is_none()
    }

    /// `ROLE_<role>` plus the name of every explicitly granted permission.
    #[must_use]
    pub fn authorities(&self) -> BTreeSet<String> {
        std::iter::once(self.role.authority())
            .chain(self.permissions.iter().map(|p| p.as_str().to_owned()))
            .collect()
    }

    #[must_use]
    pub fn should_update_password(&self) -> bool {
        self.should_update_password_at(OffsetDateTime::now_utc())
    }

    #[must_use]
    pub fn should_update_password_at(&self, now: OffsetDateTime) -> bool {
        self.should_update_password_after(PASSWORD_MAX_AGE, now)
    }

    /// True if the record was last modified more than `max_age` before `now`.
    #[must_use]
    pub fn should_update_password_after(&self, max_age: Duration, now: OffsetDateTime) -> bool {
        self.record.updated_at.saturating_add(max_age) < now
    }

    // ---- authorization ----

    /// Admins implicitly hold every permission.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.is_admin() || self.permissions.contains(&permission)
    }

    #[must_use]
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(*p))
    }

    #[must_use]
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.has_permission(*p))
    }

    /// Tenant filter this user's queries must be bound to.
    #[must_use]
    pub fn tenant_scope(&self) -> TenantScope {
        if self.role == Role::SuperAdmin {
            TenantScope::AllTenants
        } else {
            TenantScope::Tenant(self.record.tenant_id.clone())
        }
    }

    /// Super-admins bypass tenant isolation.
    #[must_use]
    pub fn can_access_tenant(&self, tenant_id: &str) -> bool {
        self.role == Role::SuperAdmin || self.record.tenant_id == tenant_id
    }

    // ---- copy-on-write helpers ----

    fn modified(&self) -> Self {
        let mut next = self.clone();
        next.record.touch_at(OffsetDateTime::now_utc());
        next
    }

    #[must_use]
    pub fn with_password(&self, password_hash: PasswordHash) -> Self {
        let mut next = self.modified();
        next.password_hash = password_hash;
        next
    }

    /// Records a successful login: bumps `login_count` and clears the failed
    /// attempt counter.
    #[must_use]
    pub fn with_last_login(&self, ip: impl Into<String>) -> Self {
        let mut next = self.modified();
        next.last_login_at = Some(OffsetDateTime::now_utc());
        next.last_login_ip = Some(ip.into());
        next.login_count = next.login_count.saturating_add(1);
        next.failed_login_attempts = 0;
        next
    }

    #[must_use]
    pub fn with_failed_login(&self) -> Self {
        let mut next = self.modified();
        next.failed_login_attempts = next.failed_login_attempts.saturating_add(1);
        next
    }

    #[must_use]
    pub fn with_email_verified(&self) -> Self {
        let mut next = self.modified();
        next.email_verified_at = Some(OffsetDateTime::now_utc());
        next.email_verification_token = None;
        next
    }

    #[must_use]
    pub fn with_password_reset(&self, token: impl Into<String>, expires_at: OffsetDateTime) -> Self {
        let mut next = self.modified();
        next.password_reset_token = Some(token.into());
        next.password_reset_expires_at = Some(expires_at);
        next
    }

    #[must_use]
    pub fn without_password_reset(&self) -> Self {
        let mut next = self.modified();
        next.password_reset_token = None;
        next.password_reset_expires_at = None;
        next
    }

    #[must_use]
    pub fn with_status(&self, status: UserStatus) -> Self {
        let mut next = self.modified();
        next.status = status;
        next
    }

    #[must_use]
    pub fn with_role(&self, role: Role) -> Self {
        let mut next = self.modified();
        next.role = role;
        next
    }

    #[must_use]
    pub fn with_permissions(&self, permissions: BTreeSet<Permission>) -> Self {
        let mut next = self.modified();
        next.permissions = permissions;
        next
    }

    /// `None` lifts the lock.
    #[must_use]
    pub fn with_lock_until(&self, until: Option<OffsetDateTime>) -> Self {
        let mut next = self.modified();
        next.account_locked_until = until;
        next
    }

    #[must_use]
    pub fn with_metadata(&self, metadata: Option<String>) -> Self {
        let mut next = self.modified();
        next.record.metadata = metadata;
        next
    }

    #[must_use]
    pub fn with_preferences(&self, preferences: Option<String>) -> Self {
        let mut next = self.modified();
        next.preferences = preferences;
        next
    }

    #[must_use]
    pub fn with_profile(&self, patch: &UserPatch) -> Self {
        let mut next = self.modified();
        if let Some(v) = &patch.first_name {
            next.first_name.clone_from(v);
        }
        if let Some(v) = &patch.last_name {
            next.last_name.clone_from(v);
        }
        if let Some(v) = &patch.display_name {
            next.display_name = Some(v.clone());
        }
        if let Some(v) = &patch.avatar_url {
            next.avatar_url = Some(v.clone());
        }
        if let Some(v) = &patch.phone {
            next.phone = Some(v.clone());
        }
        if let Some(v) = &patch.timezone {
            next.timezone.clone_from(v);
        }
        if let Some(v) = &patch.locale {
            next.locale.clone_from(v);
        }
        next
    }

    /// Soft-deletes the account: stamps the deletion, attributes it to
    /// `actor` and moves the status to `DELETED`.
    #[must_use]
    pub fn soft_delete(&self, actor: &str) -> Self {
        let mut next = self.clone();
        next.record.mark_as_deleted(actor);
        next.status = UserStatus::Deleted;
        next
    }
}

impl Record for User {
    fn record_kind(&self) -> &'static str {
        "user"
    }

    fn envelope(&self) -> &RecordEnvelope {
        &self.record
    }

    fn envelope_mut(&mut self) -> &mut RecordEnvelope {
        &mut self.record
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}

impl Eq for User {}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.record.id())
            .field("tenant_id", &self.record.tenant_id)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("status", &self.status)
            .field("permissions", &self.permissions)
            .field("deleted_at", &self.record.deleted_at)
            .field("version", &self.record.version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user() -> User {
        User::new(
            "acme",
            "ada@acme.io",
            PasswordHash::new("h".repeat(60)),
            "Ada",
            "Lovelace",
        )
    }

    #[test]
    fn new_user_has_defaults() {
        let u = user();
        assert_eq!(u.role, Role::User);
        assert_eq!(u.status, UserStatus::Active);
        assert!(u.permissions.is_empty());
        assert_eq!(u.login_count, 0);
        assert_eq!(u.failed_login_attempts, 0);
        assert_eq!(u.timezone, "UTC");
        assert_eq!(u.locale, "en");
        assert!(u.is_new());
        assert!(u.is_enabled());
    }

    #[test]
    fn display_name_falls_back_to_full_name() {
        let mut u = user();
        assert_eq!(u.full_name(), "Ada Lovelace");
        assert_eq!(u.display_name_or_full_name(), "Ada Lovelace");

        u.display_name = Some("   ".to_owned());
        assert_eq!(u.display_name_or_full_name(), "Ada Lovelace");

        u.display_name = Some("Countess".to_owned());
        assert_eq!(u.display_name_or_full_name(), "Countess");
    }

    #[test]
    fn password_reset_requires_token_and_future_expiry() {
        let now = OffsetDateTime::now_utc();
        let mut u = user();
        u.password_reset_expires_at = Some(now + Duration::hours(1));
        assert!(!u.is_password_reset_valid_at(now), "no token");

        u.password_reset_token = Some("t".to_owned());
        assert!(u.is_password_reset_valid_at(now));
        assert!(!u.is_password_reset_valid_at(now + Duration::hours(1)), "expiry is exclusive");
    }

    #[test]
    fn lock_is_evaluated_against_now() {
        let now = OffsetDateTime::now_utc();
        let locked = user().with_lock_until(Some(now + Duration::hours(1)));
        assert!(locked.is_locked_at(now));
        assert!(!locked.is_account_non_locked_at(now));

        let expired = user().with_lock_until(Some(now - Duration::hours(1)));
        assert!(!expired.is_locked_at(now));
        assert!(expired.is_account_non_locked_at(now));

        assert!(!user().is_locked_at(now));
    }

    #[test]
    fn deletable_excludes_super_admin_and_system() {
        assert!(user().is_deletable());
        assert!(user().with_role(Role::Admin).is_deletable());
        assert!(!user().with_role(Role::SuperAdmin).is_deletable());
        assert!(!user().with_status(UserStatus::System).is_deletable());
    }

    #[test]
    fn enabled_requires_active_and_not_deleted() {
        assert!(!user().with_status(UserStatus::Suspended).is_enabled());
        let mut deleted = user();
        deleted.record.deleted_at = Some(OffsetDateTime::now_utc());
        assert!(!deleted.is_enabled());
        assert!(!deleted.is_account_non_expired());
    }

    #[test]
    fn authorities_include_role_and_permissions() {
        let u = user()
            .with_role(Role::Analyst)
            .with_permissions([Permission::ReportRead, Permission::AnalyticsRead].into());
        let auth = u.authorities();
        assert_eq!(auth.len(), 3);
        assert!(auth.contains("ROLE_ANALYST"));
        assert!(auth.contains("REPORT_READ"));
        assert!(auth.contains("ANALYTICS_READ"));
    }

    #[test]
    fn explicit_permissions_are_checked() {
        let u = user().with_permissions([Permission::UserRead, Permission::UserUpdate].into());
        assert!(u.has_permission(Permission::UserRead));
        assert!(!u.has_permission(Permission::UserDelete));
        assert!(u.has_any_permission(&[Permission::UserDelete, Permission::UserUpdate]));
        assert!(!u.has_any_permission(&[Permission::UserDelete]));
        assert!(u.has_all_permissions(&[Permission::UserRead, Permission::UserUpdate]));
        assert!(!u.has_all_permissions(&[Permission::UserRead, Permission::UserDelete]));
    }

    #[test]
    fn empty_permission_lists() {
        let u = user();
        assert!(!u.has_any_permission(&[]));
        assert!(u.has_all_permissions(&[]));
    }

    #[test]
    fn super_admin_scope_is_unrestricted() {
        assert_eq!(user().tenant_scope(), TenantScope::tenant("acme"));
        assert_eq!(
            user().with_role(Role::SuperAdmin).tenant_scope(),
            TenantScope::AllTenants
        );
        assert!(!user().with_role(Role::Admin).can_access_tenant("globex"));
    }

    #[test]
    fn login_and_verification_use_current_time_despite_clock_skew() {
        let mut u = user();
        u.record.updated_at = OffsetDateTime::now_utc() + Duration::hours(2);

        let logged_in = u.with_last_login("10.0.0.1");
        let verified = u.with_email_verified();
        let now = OffsetDateTime::now_utc();

        assert!(logged_in.last_login_at.is_some_and(|at| at <= now));
        assert!(verified.email_verified_at.is_some_and(|at| at <= now));
        assert_eq!(logged_in.record.updated_at, u.record.updated_at);
    }

    #[test]
    fn tenant_access_agrees_with_scope() {
        for role in Role::ALL {
            let u = user().with_role(role);
            for t in ["acme", "globex"] {
                assert_eq!(u.can_access_tenant(t), u.tenant_scope().admits(t), "{role} / {t}");
            }
        }
    }

    #[test]
    fn helpers_leave_receiver_untouched() {
        let u = user();
        let next = u.with_failed_login().with_role(Role::Manager);
        assert_eq!(u.failed_login_attempts, 0);
        assert_eq!(u.role, Role::User);
        assert_eq!(next.failed_login_attempts, 1);
        assert_eq!(next.role, Role::Manager);
        assert!(next.record.updated_at >= u.record.updated_at);
    }

    #[test]
    fn email_verification_clears_token() {
        let mut u = user();
        u.email_verification_token = Some("verify-me".to_owned());
        let verified = u.with_email_verified();
        assert!(verified.is_email_verified());
        assert!(verified.email_verification_token.is_none());
        assert!(!u.is_email_verified());
    }

    #[test]
    fn profile_patch_only_touches_given_fields() {
        let patch = UserPatch {
            display_name: Some("Countess".to_owned()),
            timezone: Some("Europe/London".to_owned()),
            ..UserPatch::default()
        };
        let u = user().with_profile(&patch);
        assert_eq!(u.display_name.as_deref(), Some("Countess"));
        assert_eq!(u.timezone, "Europe/London");
        assert_eq!(u.first_name, "Ada");
        assert_eq!(u.locale, "en");
        assert!(UserPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn metadata_and_preferences_are_opaque() {
        let u = user()
            .with_metadata(Some(r#"{"plan":"pro"}"#.to_owned()))
            .with_preferences(Some(r#"{"theme":"dark"}"#.to_owned()));
        assert_eq!(u.record.metadata.as_deref(), Some(r#"{"plan":"pro"}"#));
        assert_eq!(u.preferences.as_deref(), Some(r#"{"theme":"dark"}"#));
    }

    #[test]
    fn debug_does_not_leak_secrets() {
        let mut u = user();
        u.password_reset_token = Some("reset-secret".to_owned());
        let out = format!("{u:?}");
        assert!(!out.contains("hhhh"));
        assert!(!out.contains("reset-secret"));
        assert!(out.contains("ada@acme.io"));
    }

    #[test]
    fn users_compare_by_id() {
        let id = Uuid::new_v4();
        let mut a = user();
        let mut b = user().with_role(Role::Viewer);
        a.record.assign_id(id).unwrap();
        b.record.assign_id(id).unwrap();
        assert_eq!(a, b);
        assert_ne!(user(), user());
    }
}
