use std::fmt;
use std::str::FromStr;

use super::UnknownVariant;

/// Fine-grained capability that can be granted to a user independently of its role.
///
/// The `as_str` names are stable: they are what gets stored and what shows up
/// in the authority set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    UserRead,
    UserCreate,
    UserUpdate,
    UserDelete,
    TenantRead,
    TenantCreate,
    TenantUpdate,
    TenantDelete,
    RoleRead,
    RoleAssign,
    ReportRead,
    ReportCreate,
    ReportExport,
    AnalyticsRead,
    BillingRead,
    BillingManage,
    SettingsRead,
    SettingsUpdate,
    ApiKeyRead,
    ApiKeyManage,
    AuditLogRead,
    IntegrationManage,
    SystemConfig,
    SystemMonitor,
}

impl Permission {
    pub const ALL: [Self; 24] = [
        Self::UserRead,
        Self::UserCreate,
        Self::UserUpdate,
        Self::UserDelete,
        Self::TenantRead,
        Self::TenantCreate,
        Self::TenantUpdate,
        Self::TenantDelete,
        Self::RoleRead,
        Self::RoleAssign,
        Self::ReportRead,
        Self::ReportCreate,
        Self::ReportExport,
        Self::AnalyticsRead,
        Self::BillingRead,
        Self::BillingManage,
        Self::SettingsRead,
        Self::SettingsUpdate,
        Self::ApiKeyRead,
        Self::ApiKeyManage,
        Self::AuditLogRead,
        Self::IntegrationManage,
        Self::SystemConfig,
        Self::SystemMonitor,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserRead => "USER_READ",
            Self::UserCreate => "USER_CREATE",
            Self::UserUpdate => "USER_UPDATE",
            Self::UserDelete => "USER_DELETE",
            Self::TenantRead => "TENANT_READ",
            Self::TenantCreate => "TENANT_CREATE",
            Self::TenantUpdate => "TENANT_UPDATE",
            Self::TenantDelete => "TENANT_DELETE",
            Self::RoleRead => "ROLE_READ",
            Self::RoleAssign => "ROLE_ASSIGN",
            Self::ReportRead => "REPORT_READ",
            Self::ReportCreate => "REPORT_CREATE",
            Self::ReportExport => "REPORT_EXPORT",
            Self::AnalyticsRead => "ANALYTICS_READ",
            Self::BillingRead => "BILLING_READ",
            Self::BillingManage => "BILLING_MANAGE",
            Self::SettingsRead => "SETTINGS_READ",
            Self::SettingsUpdate => "SETTINGS_UPDATE",
            Self::ApiKeyRead => "API_KEY_READ",
            Self::ApiKeyManage => "API_KEY_MANAGE",
            Self::AuditLogRead => "AUDIT_LOG_READ",
            Self::IntegrationManage => "INTEGRATION_MANAGE",
            Self::SystemConfig => "SYSTEM_CONFIG",
            Self::SystemMonitor => "SYSTEM_MONITOR",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("permission", s))
    }
}
