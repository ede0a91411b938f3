//! Field validation for user records.
//!
//! Validators never stop at the first problem: every violated field is
//! collected and reported together in a single [`DomainError::Validation`].

use std::sync::LazyLock;

use accounts_sdk::User;
use regex::Regex;

use super::error::DomainError;
use crate::config::AccountsConfig;

#[allow(clippy::expect_used)]
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex should not panic")
});

/// Individual validation violation for a specific field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// field name, e.g. "email"
    pub field: String,
    pub message: String,
    /// machine-readable code: `blank`, `too_long`, `length`, `format`
    pub code: &'static str,
}

impl FieldViolation {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
        }
    }
}

struct Violations(Vec<FieldViolation>);

impl Violations {
    fn required(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.0
                .push(FieldViolation::new(field, "must not be blank", "blank"));
        } else {
            self.max_len(field, value, max);
        }
    }

    fn optional(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            self.max_len(field, value, max);
        }
    }

    fn max_len(&mut self, field: &str, value: &str, max: usize) {
        let len = value.chars().count();
        if len > max {
            self.0.push(FieldViolation::new(
                field,
                format!("must be at most {max} characters (got {len})"),
                "too_long",
            ));
        }
    }

    fn exact_len(&mut self, field: &str, len: usize, expected: usize) {
        if len != expected {
            self.0.push(FieldViolation::new(
                field,
                format!("must be exactly {expected} characters"),
                "length",
            ));
        }
    }

    fn email(&mut self, field: &str, value: &str, max: usize) {
        let before = self.0.len();
        self.required(field, value, max);
        if self.0.len() == before && !EMAIL_REGEX.is_match(value) {
            self.0
                .push(FieldViolation::new(field, "must be a valid email address", "format"));
        }
    }

    fn finish(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(self.0))
        }
    }
}

/// Validates every constrained field of `user`.
///
/// # Errors
/// Returns [`DomainError::Validation`] listing all violated fields.
pub fn validate_user(cfg: &AccountsConfig, user: &User) -> Result<(), DomainError> {
    let mut v = Violations(Vec::new());

    v.required("tenant_id", &user.record.tenant_id, cfg.max_tenant_id_length);
    v.email("email", &user.email, cfg.max_email_length);
    v.exact_len(
        "password_hash",
        user.password_hash.len(),
        cfg.password_hash_length,
    );
    v.required("first_name", &user.first_name, cfg.max_name_length);
    v.required("last_name", &user.last_name, cfg.max_name_length);
    v.optional(
        "display_name",
        user.display_name.as_deref(),
        cfg.max_display_name_length,
    );
    v.optional(
        "avatar_url",
        user.avatar_url.as_deref(),
        cfg.max_avatar_url_length,
    );
    v.optional("phone", user.phone.as_deref(), cfg.max_phone_length);
    v.required("timezone", &user.timezone, cfg.max_timezone_length);
    v.required("locale", &user.locale, cfg.max_locale_length);

    v.finish()
}
