//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use common::{AppError, AppResult, OptionExt, PageParams, Paginated};
use domain::{
    AdminUserCreate, AdminUserUpdate, NewUser, Password, User, UserCreate, UserPasswordUpdate,
    UserUpdate,
};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
///
/// Every payload is validated before the repository is touched.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Self-service sign up. New accounts are active and not admin.
    async fn register(&self, payload: UserCreate) -> AppResult<User>;

    /// Create a user with explicit flags
    async fn create_by_admin(&self, payload: AdminUserCreate) -> AppResult<User>;

    async fn get_user(&self, id: i32) -> AppResult<User>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list_users(&self, page: PageParams) -> AppResult<Paginated<User>>;

    async fn list_by_status(&self, is_active: bool, page: PageParams) -> AppResult<Vec<User>>;

    async fn update_user(&self, id: i32, payload: UserUpdate) -> AppResult<User>;

    async fn update_by_admin(&self, id: i32, payload: AdminUserUpdate) -> AppResult<User>;

    /// Requires the current password to verify.
    async fn change_password(&self, id: i32, payload: UserPasswordUpdate) -> AppResult<User>;

    /// Delete a user, returning the removed record
    async fn delete_user(&self, id: i32) -> AppResult<User>;

    async fn count_users(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    async fn ensure_unique(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        owner: Option<i32>,
    ) -> AppResult<()> {
        if let Some(email) = email {
            if let Some(found) = self.repo.get_by_email(email).await? {
                if Some(found.id) != owner {
                    return Err(AppError::conflict("Email"));
                }
            }
        }

        if let Some(username) = username {
            if let Some(found) = self.repo.get_by_username(username).await? {
                if Some(found.id) != owner {
                    return Err(AppError::conflict("Username"));
                }
            }
        }

        Ok(())
    }

    async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        self.ensure_unique(Some(&new_user.email), new_user.username.as_deref(), None)
            .await?;

        let user = self.repo.create(new_user).await?;
        tracing::info!(user_id = user.id, is_admin = user.is_admin, "User created");
        Ok(user)
    }

    async fn apply_update(&self, id: i32, changes: UserUpdate) -> AppResult<User> {
        let user = self.get_user(id).await?;
        if changes.is_empty() {
            return Ok(user);
        }

        let username = changes.username.as_ref().and_then(|name| name.as_deref());
        self.ensure_unique(changes.email.as_deref(), username, Some(id))
            .await?;

        let updated = self.repo.update(user, changes).await?;
        tracing::info!(user_id = id, "User updated");
        Ok(updated)
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn register(&self, payload: UserCreate) -> AppResult<User> {
        let new_user = NewUser::try_from(payload)?;
        self.insert(new_user).await
    }

    async fn create_by_admin(&self, payload: AdminUserCreate) -> AppResult<User> {
        let new_user = NewUser::try_from(payload)?;
        self.insert(new_user).await
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repo.get(id).await?.ok_or_not_found()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.get_by_email(email).await
    }

    async fn list_users(&self, page: PageParams) -> AppResult<Paginated<User>> {
        let users = self.repo.get_multi(page).await?;
        let total = self.repo.count().await?;
        Ok(Paginated::new(users, page, total))
    }

    async fn list_by_status(&self, is_active: bool, page: PageParams) -> AppResult<Vec<User>> {
        self.repo.get_multi_by_status(is_active, page).await
    }

    async fn update_user(&self, id: i32, payload: UserUpdate) -> AppResult<User> {
        payload.validate()?;
        self.apply_update(id, payload).await
    }

    async fn update_by_admin(&self, id: i32, payload: AdminUserUpdate) -> AppResult<User> {
        payload.validate()?;
        self.apply_update(id, payload.into()).await
    }

    async fn change_password(&self, id: i32, payload: UserPasswordUpdate) -> AppResult<User> {
        payload.validate()?;
        let user = self.get_user(id).await?;

        if !user.password().verify(&payload.current_password) {
            tracing::warn!(user_id = id, "Password change rejected");
            return Err(AppError::InvalidCredentials);
        }

        let hashed = Password::new(&payload.new_password)?;
        let updated = self.repo.set_password(user, hashed.into_string()).await?;
        tracing::info!(user_id = id, "Password changed");
        Ok(updated)
    }

    async fn delete_user(&self, id: i32) -> AppResult<User> {
        let removed = self.repo.remove(id).await?.ok_or_not_found()?;
        tracing::info!(user_id = id, "User deleted");
        Ok(removed)
    }

    async fn count_users(&self) -> AppResult<u64> {
        self.repo.count().await
    }
}
