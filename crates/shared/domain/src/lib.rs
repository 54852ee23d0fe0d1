//! Domain layer - User record, payload schemas and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod constants;
pub mod error;
pub mod password;
pub mod user;

pub use constants::*;
pub use error::{format_validation_errors, DomainError, DomainResult};
pub use password::Password;
pub use user::{
    AdminDashboardStats, AdminUserCreate, AdminUserResponse, AdminUserUpdate, NewUser, User,
    UserCreate, UserPasswordUpdate, UserProfile, UserProfileUpdate, UserRead, UserUpdate,
};
