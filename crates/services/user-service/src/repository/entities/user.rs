//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{IntoActiveModel, Set};

use domain::{AdminUserUpdate, NewUser, User, UserUpdate};

use crate::repository::base::Changes;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: Option<String>,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// Timestamps are owned by the persistence layer.
#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert && self.created_at.is_not_set() {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            email: model.email,
            username: model.username,
            hashed_password: model.hashed_password,
            is_active: model.is_active,
            is_admin: model.is_admin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<User> for Model {
    fn from(user: User) -> Self {
        Model {
            id: user.id,
            email: user.email,
            username: user.username,
            hashed_password: user.hashed_password,
            is_active: user.is_active,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl IntoActiveModel<ActiveModel> for NewUser {
    fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            email: Set(self.email),
            username: Set(self.username),
            hashed_password: Set(self.hashed_password),
            is_active: Set(self.is_active),
            is_admin: Set(self.is_admin),
            ..Default::default()
        }
    }
}

impl Changes<ActiveModel> for UserUpdate {
    fn apply_to(self, model: &mut ActiveModel) {
        if let Some(email) = self.email {
            model.email = Set(email);
        }
        if let Some(username) = self.username {
            model.username = Set(username);
        }
        if let Some(is_active) = self.is_active {
            model.is_active = Set(is_active);
        }
        if let Some(is_admin) = self.is_admin {
            model.is_admin = Set(is_admin);
        }
    }
}

impl Changes<ActiveModel> for AdminUserUpdate {
    fn apply_to(self, model: &mut ActiveModel) {
        UserUpdate::from(self).apply_to(model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn stored() -> Model {
        let now = chrono::Utc::now();
        Model {
            id: 1,
            email: "ada@example.com".to_string(),
            username: Some("ada".to_string()),
            hashed_password: "hash".to_string(),
            is_active: true,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_user_leaves_id_and_timestamps_unset() {
        let active = NewUser {
            email: "ada@example.com".to_string(),
            username: None,
            hashed_password: "hash".to_string(),
            is_active: true,
            is_admin: false,
        }
        .into_active_model();

        assert!(active.id.is_not_set());
        assert!(active.created_at.is_not_set());
        assert_eq!(active.email, ActiveValue::Set("ada@example.com".to_string()));
    }

    #[test]
    fn test_user_update_sets_only_present_fields() {
        let mut active = stored().into_active_model();
        UserUpdate {
            is_admin: Some(true),
            ..Default::default()
        }
        .apply_to(&mut active);

        assert_eq!(active.is_admin, ActiveValue::Set(true));
        assert!(matches!(active.email, ActiveValue::Unchanged(_)));
        assert!(matches!(active.username, ActiveValue::Unchanged(_)));
        assert!(matches!(active.is_active, ActiveValue::Unchanged(_)));
    }

    #[test]
    fn test_user_update_clears_username() {
        let mut active = stored().into_active_model();
        UserUpdate {
            username: Some(None),
            ..Default::default()
        }
        .apply_to(&mut active);

        assert_eq!(active.username, ActiveValue::Set(None));
        assert!(matches!(active.email, ActiveValue::Unchanged(_)));
    }

    #[test]
    fn test_active_model_patch_copies_set_fields() {
        let mut active = stored().into_active_model();
        let patch = ActiveModel {
            hashed_password: Set("new-hash".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut active);

        assert_eq!(active.hashed_password, ActiveValue::Set("new-hash".to_string()));
        assert!(matches!(active.email, ActiveValue::Unchanged(_)));
    }

    #[test]
    fn test_domain_round_trip() {
        let model = stored();
        let user = User::from(model.clone());
        assert_eq!(Model::from(user), model);
    }
}
