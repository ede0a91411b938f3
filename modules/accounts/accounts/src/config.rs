//! Configuration for the accounts module.

use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment variable prefix; `ACCOUNTS_MAX_FAILED_LOGIN_ATTEMPTS=3` overrides
/// `max_failed_login_attempts`.
pub const ENV_PREFIX: &str = "ACCOUNTS_";

/// Keys read from the environment. Other `ACCOUNTS_*` variables belong to
/// neighbouring components and are ignored.
const ENV_KEYS: [&str; 15] = [
    "default_timezone",
    "default_locale",
    "password_max_age",
    "max_failed_login_attempts",
    "lockout_duration",
    "password_reset_ttl",
    "password_hash_length",
    "max_tenant_id_length",
    "max_email_length",
    "max_name_length",
    "max_display_name_length",
    "max_avatar_url_length",
    "max_phone_length",
    "max_timezone_length",
    "max_locale_length",
];

/// Module configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountsConfig {
    /// Timezone assigned to users registered without one.
    pub default_timezone: String,
    /// Locale assigned to users registered without one.
    pub default_locale: String,

    /// Age after which a password is due for rotation.
    #[serde(with = "crate::humantime_serde")]
    pub password_max_age: Duration,
    /// Consecutive failed logins that lock the account. `0` disables lockout.
    pub max_failed_login_attempts: u32,
    #[serde(with = "crate::humantime_serde")]
    pub lockout_duration: Duration,
    /// Lifetime of a password-reset token.
    #[serde(with = "crate::humantime_serde")]
    pub password_reset_ttl: Duration,

    /// Exact length of a stored password hash (60 for bcrypt).
    pub password_hash_length: usize,
    pub max_tenant_id_length: usize,
    pub max_email_length: usize,
    pub max_name_length: usize,
    pub max_display_name_length: usize,
    pub max_avatar_url_length: usize,
    pub max_phone_length: usize,
    pub max_timezone_length: usize,
    pub max_locale_length: usize,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            default_timezone: accounts_sdk::models::DEFAULT_TIMEZONE.to_owned(),
            default_locale: accounts_sdk::models::DEFAULT_LOCALE.to_owned(),
            password_max_age: Duration::from_secs(90 * 24 * 60 * 60),
            max_failed_login_attempts: 5,
            lockout_duration: Duration::from_secs(30 * 60),
            password_reset_ttl: Duration::from_secs(60 * 60),
            password_hash_length: 60,
            max_tenant_id_length: 64,
            max_email_length: 255,
            max_name_length: 100,
            max_display_name_length: 100,
            max_avatar_url_length: 500,
            max_phone_length: 20,
            max_timezone_length: 50,
            max_locale_length: 10,
        }
    }
}

impl AccountsConfig {
    /// Extracts the configuration from an already assembled figment.
    ///
    /// # Errors
    /// Returns an error if a value has the wrong type or an unknown key is present.
    pub fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        figment
            .extract::<Self>()
            .context("invalid accounts configuration")
    }

    /// Loads defaults, then the optional YAML file, then `ACCOUNTS_*` env vars.
    ///
    /// # Errors
    /// Returns an error if the file cannot be parsed or a value is invalid.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading accounts configuration file");
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).only(&ENV_KEYS));
        Self::from_figment(&figment)
    }

    #[must_use]
    pub fn password_max_age(&self) -> time::Duration {
        to_time_duration(self.password_max_age)
    }

    #[must_use]
    pub fn lockout_duration(&self) -> time::Duration {
        to_time_duration(self.lockout_duration)
    }

    #[must_use]
    pub fn password_reset_ttl(&self) -> time::Duration {
        to_time_duration(self.password_reset_ttl)
    }
}

fn to_time_duration(d: Duration) -> time::Duration {
    time::Duration::try_from(d).unwrap_or(time::Duration::MAX)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn defaults_match_account_policy() {
        let cfg = AccountsConfig::default();
        assert_eq!(cfg.password_max_age(), time::Duration::days(90));
        assert_eq!(cfg.lockout_duration(), time::Duration::minutes(30));
        assert_eq!(cfg.password_reset_ttl(), time::Duration::hours(1));
        assert_eq!(cfg.max_failed_login_attempts, 5);
        assert_eq!(cfg.password_hash_length, 60);
        assert_eq!(cfg.default_timezone, "UTC");
        assert_eq!(cfg.default_locale, "en");
    }

    #[test]
    fn partial_figment_keeps_defaults() {
        let figment = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "max_failed_login_attempts": 3,
            "lockout_duration": "15m",
        })));
        let cfg = AccountsConfig::from_figment(&figment).unwrap();
        assert_eq!(cfg.max_failed_login_attempts, 3);
        assert_eq!(cfg.lockout_duration(), time::Duration::minutes(15));
        assert_eq!(cfg.max_email_length, 255);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let figment = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "max_failed_logins": 3,
        })));
        assert!(AccountsConfig::from_figment(&figment).is_err());
    }

    #[test]
    fn env_keys_cover_every_field() {
        let defaults = serde_json::to_value(AccountsConfig::default()).unwrap();
        let mut fields: Vec<&str> = defaults
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let mut keys = ENV_KEYS.to_vec();
        fields.sort_unstable();
        keys.sort_unstable();
        assert_eq!(fields, keys);
    }

    #[test]
    fn unrelated_prefixed_env_vars_are_ignored() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ACCOUNTS_DATABASE_URL", "postgres://db/accounts");
            jail.set_env("ACCOUNTS_MAX_FAILED_LOGIN_ATTEMPTS", "3");
            jail.set_env("ACCOUNTS_LOCKOUT_DURATION", "15m");

            let cfg = AccountsConfig::load(None).map_err(|e| format!("{e:#}"))?;
            assert_eq!(cfg.max_failed_login_attempts, 3);
            assert_eq!(cfg.lockout_duration(), time::Duration::minutes(15));
            Ok(())
        });
    }

    #[test]
    fn load_reads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_locale: de\npassword_max_age: 30days").unwrap();

        let cfg = AccountsConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.default_locale, "de");
        assert_eq!(cfg.password_max_age(), time::Duration::days(30));
        assert_eq!(cfg.default_timezone, "UTC");
    }
}
