//! Repository layer for data access.

pub mod base;
pub mod entities;
mod user_repository;

pub use base::{BaseRepository, Changes, PrimaryKeyOf};
pub use user_repository::{UserCrud, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
