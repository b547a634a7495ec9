//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use eventhub_auth::PasswordHasher;
use eventhub_core::config::AppConfig;
use eventhub_core::error::AppError;
use eventhub_entity::user::{CreateUser, User};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
    /// Create a user
    Create {
        /// Username
        username: String,
        /// Given name
        #[arg(long)]
        first_name: String,
        /// Family name
        #[arg(long)]
        last_name: String,
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete a user
    Delete {
        /// Username
        username: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Username
    username: String,
    /// Full name
    name: String,
    /// Created at
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            username: u.username.clone(),
            name: u.full_name(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let identities = eventhub_api::build_stores(config).await?.identities;

    match &args.command {
        UserCommand::List => {
            let users = identities.find_all().await?;
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::Create {
            username,
            first_name,
            last_name,
            password,
        } => {
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };
            if password.len() < 6 {
                return Err(AppError::validation(
                    "Password must be at least 6 characters",
                ));
            }

            let user = identities
                .create(&CreateUser {
                    first_name: first_name.clone(),
                    last_name: last_name.clone(),
                    username: User::normalize_username(username),
                    password_hash: PasswordHasher::new().hash_password(&password)?,
                })
                .await?;

            output::print_success(&format!("User '{}' created", user.username));
            output::print_kv("ID", &user.id.to_string());
        }
        UserCommand::Delete { username, force } => {
            let user = identities
                .find_by_username(username)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))?;

            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete user '{}'?", user.username))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            identities.delete(user.id).await?;
            output::print_success(&format!("User '{}' deleted", user.username));
        }
    }

    Ok(())
}
