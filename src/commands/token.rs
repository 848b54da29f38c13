//! Token issuance and inspection CLI commands.

use chrono::Utc;
use clap::{Args, Subcommand};
use uuid::Uuid;

use keygate_auth::TokenService;
use keygate_core::config::AppConfig;
use keygate_core::error::AppError;

use super::KindArg;
use crate::output::{self, ClaimsView, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Mint a token pair for an email
    Issue {
        /// Subject email
        #[arg(long)]
        email: String,
        /// Access token TTL in minutes (defaults to config)
        #[arg(long)]
        access_ttl: Option<u64>,
        /// Refresh token TTL in minutes (defaults to config)
        #[arg(long)]
        refresh_ttl: Option<u64>,
        /// Also register the pair's sessions in the cache for this user ID
        #[arg(long)]
        user_id: Option<Uuid>,
    },
    /// Validate a signed token and show its claims
    Inspect {
        /// Signed token
        token: String,
        /// Which secret to validate with
        #[arg(long, value_enum, default_value = "access")]
        kind: KindArg,
    },
}

/// Execute token commands
pub async fn execute(
    args: &TokenArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let tokens = TokenService::new(&config.auth);

    match &args.command {
        TokenCommand::Issue {
            email,
            access_ttl,
            refresh_ttl,
            user_id,
        } => {
            let now = Utc::now();
            let pair = tokens.generate_token_pair(
                email,
                access_ttl.unwrap_or(config.auth.access_ttl_minutes),
                refresh_ttl.unwrap_or(config.auth.refresh_ttl_minutes),
            )?;

            if let Some(user_id) = user_id {
                let store = super::session_store(config).await?;
                store.register(&pair, *user_id, now).await?;
                if config.cache.provider == "memory" {
                    output::print_warning(
                        "Sessions registered in an in-process cache vanish on exit",
                    );
                }
            }

            println!("{}", output::render_token_pair(&pair, format));
        }
        TokenCommand::Inspect { token, kind } => {
            let now = Utc::now();
            let view = match kind {
                KindArg::Access => ClaimsView::new(&tokens.validate_access_token(token)?, now),
                KindArg::Refresh => ClaimsView::new(&tokens.validate_refresh_token(token)?, now),
            };
            println!("{}", output::render_record(&view, format));
        }
    }

    Ok(())
}

