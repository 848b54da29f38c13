//! Session inspection and revocation CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use keygate_core::config::AppConfig;
use keygate_core::error::AppError;

use super::KindArg;
use crate::output::{self, OutputFormat};

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Show whether a token identifier has a live session
    Status {
        /// Token identifier (`access_uuid` or `refresh_uuid` claim)
        id: Uuid,
        /// Token kind of the identifier
        #[arg(long, value_enum, default_value = "access")]
        kind: KindArg,
    },
    /// Revoke the session of a token identifier
    Revoke {
        /// Token identifier (`access_uuid` or `refresh_uuid` claim)
        id: Uuid,
        /// Token kind of the identifier
        #[arg(long, value_enum, default_value = "access")]
        kind: KindArg,
    },
}

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    /// Token identifier
    token_id: String,
    /// Token kind
    kind: String,
    /// Owning user
    user_id: String,
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::session_store(config).await?;

    match &args.command {
        SessionCommand::Status { id, kind } => {
            let owner = match kind {
                KindArg::Access => store.access_owner(*id).await?,
                KindArg::Refresh => store.refresh_owner(*id).await?,
            };
            match owner {
                Some(user_id) => {
                    let row = SessionRow {
                        token_id: id.to_string(),
                        kind: kind_label(*kind).to_string(),
                        user_id: user_id.to_string(),
                    };
                    println!("{}", output::render_record(&row, format));
                }
                None => output::print_warning(&format!(
                    "No live {} session for {id}",
                    kind_label(*kind)
                )),
            }
        }
        SessionCommand::Revoke { id, kind } => {
            let removed = match kind {
                KindArg::Access => store.revoke_access(*id).await?,
                KindArg::Refresh => store.consume_refresh(*id).await?,
            };
            if removed {
                output::print_success(&format!("Revoked {} session {id}", kind_label(*kind)));
            } else {
                output::print_warning(&format!("No live {} session for {id}", kind_label(*kind)));
            }
        }
    }

    Ok(())
}

fn kind_label(kind: KindArg) -> &'static str {
    match kind {
        KindArg::Access => "access",
        KindArg::Refresh => "refresh",
    }
}
