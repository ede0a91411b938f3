//! `SeaORM` entities for accounts.

pub use user::Entity as UserEntity;

/// User entity module.
pub mod user {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue;
    use time::OffsetDateTime;

    use crate::domain::guard;

    /// User entity for the `users` table.
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub tenant_id: String,
        pub external_id: Option<String>,
        pub email: String,
        pub password_hash: String,
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
        pub role: String,
        pub status: String,
        /// JSON array of permission names.
        #[sea_orm(column_type = "Text")]
        pub permissions: String,
        pub last_login_at: Option<OffsetDateTime>,
        pub last_login_ip: Option<String>,
        pub login_count: i64,
        pub failed_login_attempts: i64,
        pub account_locked_until: Option<OffsetDateTime>,
        #[sea_orm(column_type = "Text", nullable)]
        pub metadata: Option<String>,
        #[sea_orm(column_type = "Text", nullable)]
        pub preferences: Option<String>,
        #[sea_orm(column_type = "Text", nullable)]
        pub notes: Option<String>,
        pub deleted: bool,
        pub deleted_at: Option<OffsetDateTime>,
        pub deleted_by: Option<String>,
        pub created_at: OffsetDateTime,
        pub updated_at: OffsetDateTime,
        pub created_by: Option<String>,
        pub last_modified_by: Option<String>,
        pub version: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    #[async_trait::async_trait]
    impl ActiveModelBehavior for ActiveModel {
        async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
        where
            C: ConnectionTrait,
        {
            self.stamp(insert, OffsetDateTime::now_utc())
        }
    }

    impl ActiveModel {
        /// Audit bookkeeping applied on every save.
        ///
        /// Inserts must carry a tenant; updates that leave `tenant_id` unset
        /// keep the stored one.
        pub(crate) fn stamp(mut self, insert: bool, now: OffsetDateTime) -> Result<Self, DbErr> {
            let tenant_id = match &self.tenant_id {
                ActiveValue::Set(t) | ActiveValue::Unchanged(t) => Some(t.as_str()),
                ActiveValue::NotSet if insert => Some(""),
                ActiveValue::NotSet => None,
            };
            if let Some(tenant_id) = tenant_id {
                guard::ensure_tenant_assigned("user", tenant_id)
                    .map_err(|e| DbErr::Custom(e.to_string()))?;
            }

            if insert {
                if matches!(self.created_at, ActiveValue::NotSet) {
                    self.created_at = ActiveValue::Set(now);
                }
                self.version = ActiveValue::Set(0);
            } else if let ActiveValue::Set(v) | ActiveValue::Unchanged(v) = &self.version {
                self.version = ActiveValue::Set(v.saturating_add(1));
            }
            self.updated_at = ActiveValue::Set(now);

            if let ActiveValue::Set(d) | ActiveValue::Unchanged(d) = &self.deleted_at {
                self.deleted = ActiveValue::Set(d.is_some());
            }

            tracing::trace!(insert, version = ?self.version, "Stamped user row");
            Ok(self)
        }
    }
}
