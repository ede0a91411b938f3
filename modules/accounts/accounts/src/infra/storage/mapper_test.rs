#[cfg(test)]
mod tests {
    use super::super::*;
    use accounts_sdk::{PasswordHash, Permission, Role, User, UserStatus};
    use sea_orm::ActiveValue;
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::domain::error::DomainError;
    use entity::user;
    use mapper::{to_active_model, MapperError};

    fn row() -> user::Model {
        let at = datetime!(2026-02-10 08:30 UTC);
        user::Model {
            id: Uuid::new_v4(),
            tenant_id: "acme".to_owned(),
            external_id: Some("idp-42".to_owned()),
            email: "ada@acme.io".to_owned(),
            password_hash: "h".repeat(60),
            password_reset_token: None,
            password_reset_expires_at: None,
            email_verification_token: None,
            email_verified_at: Some(at),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            display_name: None,
            avatar_url: None,
            phone: None,
            timezone: "Europe/London".to_owned(),
            locale: "en".to_owned(),
            role: "MANAGER".to_owned(),
            status: "ACTIVE".to_owned(),
            permissions: r#"["REPORT_READ","USER_READ"]"#.to_owned(),
            last_login_at: Some(at),
            last_login_ip: Some("10.1.2.3".to_owned()),
            login_count: 12,
            failed_login_attempts: 1,
            account_locked_until: None,
            metadata: Some(r#"{"plan":"pro"}"#.to_owned()),
            preferences: None,
            notes: None,
            deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: at,
            updated_at: at,
            created_by: Some("system".to_owned()),
            last_modified_by: Some("system".to_owned()),
            version: 3,
        }
    }

    #[test]
    fn test_row_to_user_conversion() {
        let model = row();
        let id = model.id;

        let u = User::try_from(model).unwrap();

        assert_eq!(u.record.id(), Some(id));
        assert_eq!(u.record.tenant_id, "acme");
        assert_eq!(u.record.version, 3);
        assert_eq!(u.record.metadata.as_deref(), Some(r#"{"plan":"pro"}"#));
        assert_eq!(u.role, Role::Manager);
        assert_eq!(u.status, UserStatus::Active);
        assert_eq!(u.login_count, 12);
        assert!(u.has_permission(Permission::ReportRead));
        assert!(u.has_permission(Permission::UserRead));
        assert!(!u.has_permission(Permission::UserDelete));
        assert!(u.is_email_verified());
        assert!(!u.record.is_deleted());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let mut model = row();
        model.role = "OWNER".to_owned();
        let err = User::try_from(model).unwrap_err();
        assert!(matches!(err, MapperError::UnknownVariant(_)));
        assert!(err.to_string().contains("OWNER"));
    }

    #[test]
    fn test_unknown_permission_is_rejected() {
        let mut model = row();
        model.permissions = r#"["USER_READ","TELEPORT"]"#.to_owned();
        assert!(matches!(
            User::try_from(model),
            Err(MapperError::UnknownVariant(_))
        ));
    }

    #[test]
    fn test_malformed_permissions_column() {
        let mut model = row();
        model.permissions = "USER_READ".to_owned();
        assert!(matches!(
            User::try_from(model),
            Err(MapperError::Permissions(_))
        ));
    }

    #[test]
    fn test_negative_counter_is_out_of_range() {
        let mut model = row();
        model.failed_login_attempts = -1;
        let err = User::try_from(model).unwrap_err();
        assert!(matches!(
            err,
            MapperError::CounterOutOfRange {
                field: "failed_login_attempts",
                value: -1
            }
        ));
        assert!(matches!(DomainError::from(err), DomainError::Storage { .. }));
    }

    #[test]
    fn test_new_user_gets_time_ordered_id() {
        let u = User::new("acme", "ada@acme.io", PasswordHash::new("h".repeat(60)), "Ada", "L");
        let am = to_active_model(&u).unwrap();

        let ActiveValue::Set(id) = am.id else {
            panic!("new user must get a fresh id");
        };
        assert_eq!(id.get_version_num(), 7);
        assert_eq!(am.version, ActiveValue::Unchanged(0));
        assert_eq!(am.permissions, ActiveValue::Set("[]".to_owned()));
    }

    #[test]
    fn test_persisted_user_keeps_id_and_fields() {
        let model = row();
        let id = model.id;
        let u = User::try_from(model).unwrap().soft_delete("admin-1");

        let am = to_active_model(&u).unwrap();
        assert_eq!(am.id, ActiveValue::Unchanged(id));
        assert_eq!(am.status, ActiveValue::Set("DELETED".to_owned()));
        assert_eq!(am.deleted, ActiveValue::Set(true));
        assert_eq!(am.deleted_by, ActiveValue::Set(Some("admin-1".to_owned())));
        assert_eq!(am.password_hash, ActiveValue::Set("h".repeat(60)));
        assert_eq!(
            am.permissions,
            ActiveValue::Set(r#"["USER_READ","REPORT_READ"]"#.to_owned())
        );
    }
}
