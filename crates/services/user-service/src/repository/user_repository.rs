//! User repository built on the generic CRUD base.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, Set};

use super::base::BaseRepository;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppResult, PageParams};
use domain::{NewUser, User, UserUpdate};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Generic CRUD over the `users` table.
pub type UserCrud = BaseRepository<UserEntity, ActiveModel, NewUser, UserUpdate>;

/// User repository trait for dependency injection.
///
/// Lookups return `None` (or an empty list) when nothing matches.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, id: i32) -> AppResult<Option<User>>;

    async fn get_multi(&self, page: PageParams) -> AppResult<Vec<User>>;

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Users with the given active flag
    async fn get_multi_by_status(&self, is_active: bool, page: PageParams)
        -> AppResult<Vec<User>>;

    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply the fields present in `changes` to `existing`
    async fn update(&self, existing: User, changes: UserUpdate) -> AppResult<User>;

    /// Replace the stored password hash
    async fn set_password(&self, existing: User, hashed_password: String) -> AppResult<User>;

    /// Delete by ID, returning the removed user
    async fn remove(&self, id: i32) -> AppResult<Option<User>>;

    async fn count(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
    crud: UserCrud,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            crud: UserCrud::new(),
        }
    }

    /// Underlying CRUD operations, for use inside a caller-managed transaction.
    pub fn crud(&self) -> &UserCrud {
        &self.crud
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn get(&self, id: i32) -> AppResult<Option<User>> {
        let model = self.crud.get(&self.db, id).await?;
        Ok(model.map(User::from))
    }

    async fn get_multi(&self, page: PageParams) -> AppResult<Vec<User>> {
        let models = self
            .crud
            .get_multi(&self.db, page.offset(), page.limit())
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let model = self
            .crud
            .get_by_attribute(&self.db, user::Column::Email, email)
            .await?;

        Ok(model.map(User::from))
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let model = self
            .crud
            .get_by_attribute(&self.db, user::Column::Username, username)
            .await?;

        Ok(model.map(User::from))
    }

    async fn get_multi_by_status(
        &self,
        is_active: bool,
        page: PageParams,
    ) -> AppResult<Vec<User>> {
        let models = self
            .crud
            .get_multi_by_attribute(
                &self.db,
                user::Column::IsActive,
                is_active,
                page.offset(),
                page.limit(),
            )
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let model = self.crud.create(&self.db, user).await?;
        tracing::debug!(user_id = model.id, "Inserted user row");
        Ok(User::from(model))
    }

    async fn update(&self, existing: User, changes: UserUpdate) -> AppResult<User> {
        let model = self.crud.update(&self.db, existing.into(), changes).await?;
        Ok(User::from(model))
    }

    async fn set_password(&self, existing: User, hashed_password: String) -> AppResult<User> {
        let patch = ActiveModel {
            hashed_password: Set(hashed_password),
            ..Default::default()
        };

        let model = self
            .crud
            .update_with(&self.db, existing.into(), patch)
            .await?;
        Ok(User::from(model))
    }

    async fn remove(&self, id: i32) -> AppResult<Option<User>> {
        let model = self.crud.remove(&self.db, id).await?;
        if let Some(model) = &model {
            tracing::debug!(user_id = model.id, "Deleted user row");
        }
        Ok(model.map(User::from))
    }

    async fn count(&self) -> AppResult<u64> {
        self.crud.count(&self.db).await
    }
}
