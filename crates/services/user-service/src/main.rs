//! User Service - migrations and user administration from the command line.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain::DEFAULT_LIMIT;
use user_service_lib::config::UserServiceConfig;
use user_service_lib::{MigrateAction, UserCommand};

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User management service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// User administration commands
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a user
    Create {
        #[arg(long)]
        email: String,
        #[arg(long, env = "USER_SERVICE_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        username: Option<String>,
        /// Grant admin rights
        #[arg(long)]
        admin: bool,
    },
    /// List users in id order
    List {
        #[arg(long, default_value_t = 0)]
        skip: u64,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u64,
    },
    /// Print the number of users
    Count,
    /// Delete a user by id
    Delete {
        #[arg(long)]
        id: i32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::debug!(service = %config.service.service_name, "Starting");

    match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            user_service_lib::run_migrations(&config, migrate_action).await?;
        }
        Commands::Users { action } => {
            let command = match action {
                UserCommands::Create {
                    email,
                    password,
                    username,
                    admin,
                } => UserCommand::Create {
                    email,
                    password,
                    username,
                    admin,
                },
                UserCommands::List { skip, limit } => UserCommand::List { skip, limit },
                UserCommands::Count => UserCommand::Count,
                UserCommands::Delete { id } => UserCommand::Delete { id },
            };
            user_service_lib::run_user_command(&config, command).await?;
        }
    }

    Ok(())
}
