//! Revocation list maintenance.

use std::time::Duration;

use clap::{Args, Subcommand};

use crate::output;
use eventhub_auth::RevocationSweeper;
use eventhub_core::config::AppConfig;
use eventhub_core::error::AppError;

/// Arguments for revocation commands
#[derive(Debug, Args)]
pub struct RevocationArgs {
    /// Revocation subcommand
    #[command(subcommand)]
    pub command: RevocationCommand,
}

/// Revocation subcommands
#[derive(Debug, Subcommand)]
pub enum RevocationCommand {
    /// Delete revocation records whose retention has ended
    Purge,
}

/// Execute revocation commands
pub async fn execute(args: &RevocationArgs, config: &AppConfig) -> Result<(), AppError> {
    let stores = eventhub_api::build_stores(config).await?;

    match &args.command {
        RevocationCommand::Purge => {
            let purged = RevocationSweeper::new(stores.revocations, Duration::ZERO)
                .sweep_once()
                .await?;
            output::print_success(&format!("Purged {purged} expired revocation record(s)."));
        }
    }

    Ok(())
}
