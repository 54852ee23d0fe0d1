//! User Service Library
//!
//! User storage on top of a generic SeaORM CRUD repository, the user use
//! cases built on it, and the commands behind the `user-service` binary.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::PageParams;
use domain::{AdminUserCreate, UserRead};

use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::{UserManager, UserService};

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// User administration commands.
#[derive(Debug, Clone)]
pub enum UserCommand {
    Create {
        email: String,
        password: String,
        username: Option<String>,
        admin: bool,
    },
    List {
        skip: u64,
        limit: u64,
    },
    Count,
    Delete {
        id: i32,
    },
}

/// Build the service stack over an already migrated database.
pub fn build_service(db: &Database) -> UserManager {
    let repo = Arc::new(UserStore::new(db.get_connection()));
    UserManager::new(repo)
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &UserServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;
    db.ping().await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            for migration in db.migration_status().await? {
                let marker = if migration.applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, migration.name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Run a user administration command, printing the result as JSON.
pub async fn run_user_command(
    config: &UserServiceConfig,
    command: UserCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let service = build_service(&db);

    match command {
        UserCommand::Create {
            email,
            password,
            username,
            admin,
        } => {
            let payload = AdminUserCreate {
                email,
                username,
                password,
                is_admin: admin,
                is_active: true,
            };
            let user = service.create_by_admin(payload).await?;
            println!("{}", serde_json::to_string_pretty(&UserRead::from(user))?);
        }
        UserCommand::List { skip, limit } => {
            let page = service
                .list_users(PageParams::new(skip, limit))
                .await?
                .map(UserRead::from);
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        UserCommand::Count => {
            let total = service.count_users().await?;
            println!("{}", serde_json::json!({ "total_users": total }));
        }
        UserCommand::Delete { id } => {
            let removed = service.delete_user(id).await?;
            info!(user_id = removed.id, "Removed user");
            println!("{}", serde_json::to_string_pretty(&UserRead::from(removed))?);
        }
    }

    Ok(())
}
