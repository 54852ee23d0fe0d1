//! Shared setup for database-backed tests.

#![allow(dead_code)]

use common::DatabaseConfig;
use domain::NewUser;
use user_service_lib::infra::Database;

/// Fresh in-memory SQLite database with the schema applied.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn setup_db() -> Database {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        sqlx_logging: false,
    };

    Database::connect(&config)
        .await
        .expect("failed to open in-memory database")
}

pub fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        username: None,
        hashed_password: "not-a-real-hash".to_string(),
        is_active: true,
        is_admin: false,
    }
}
