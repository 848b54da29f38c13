//! TOTP enrollment and code CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use keygate_auth::MfaService;
use keygate_core::config::AppConfig;
use keygate_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for MFA commands
#[derive(Debug, Args)]
pub struct MfaArgs {
    /// MFA subcommand
    #[command(subcommand)]
    pub command: MfaCommand,
}

/// MFA subcommands
#[derive(Debug, Subcommand)]
pub enum MfaCommand {
    /// Generate a secret and provisioning code for an email
    Enroll {
        /// Account email
        #[arg(long)]
        email: String,
        /// Write the provisioning QR code PNG here
        #[arg(long)]
        qr_out: Option<PathBuf>,
    },
    /// Print the code for the current time window
    Code {
        /// Stored secret
        #[arg(long)]
        secret: String,
    },
    /// Check a code against the current time window
    Verify {
        /// Stored secret
        #[arg(long)]
        secret: String,
        /// Submitted 6-digit code
        #[arg(long)]
        code: String,
    },
}

/// Execute MFA commands
pub async fn execute(
    args: &MfaArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mfa = MfaService::new(&config.mfa);

    match &args.command {
        MfaCommand::Enroll { email, qr_out } => {
            let enrollment = mfa.generate_secret(email)?;

            if let Some(path) = qr_out {
                tokio::fs::write(path, &enrollment.qr_png)
                    .await
                    .map_err(|e| AppError::internal(format!("Failed to write QR code: {e}")))?;
                output::print_success(&format!("QR code written to '{}'", path.display()));
            }

            println!("{}", output::render_enrollment(&enrollment, format));
        }
        MfaCommand::Code { secret } => {
            println!("{}", mfa.current_code(secret)?);
        }
        MfaCommand::Verify { secret, code } => {
            if mfa.validate_code(code, secret)? {
                output::print_success("Code accepted");
            } else {
                return Err(AppError::unauthorized("Code rejected"));
            }
        }
    }

    Ok(())
}
