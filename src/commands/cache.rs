//! Cache backend CLI commands.

use std::time::{Duration, Instant};

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use keygate_auth::deadline::with_deadline;
use keygate_core::config::AppConfig;
use keygate_core::error::AppError;
use keygate_core::traits::CacheProvider;

use crate::output::{self, OutputFormat};

/// Arguments for cache commands
#[derive(Debug, Args)]
pub struct CacheArgs {
    /// Cache subcommand
    #[command(subcommand)]
    pub command: CacheCommand,
}

/// Cache subcommands
#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Check that the configured backend answers
    Ping,
}

/// Ping result
#[derive(Debug, Serialize, Tabled)]
struct PingReport {
    /// Backend name
    provider: String,
    /// Health check result
    healthy: bool,
    /// Round trip
    latency_ms: u128,
}

/// Execute cache commands
pub async fn execute(
    args: &CacheArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        CacheCommand::Ping => {
            let cache = super::connect_cache(config).await?;
            let timeout = Duration::from_millis(config.auth.call_timeout_ms);
            let started = Instant::now();

            let healthy = with_deadline(timeout, "cache ping", cache.health_check()).await?;

            let report = PingReport {
                provider: config.cache.provider.clone(),
                healthy,
                latency_ms: started.elapsed().as_millis(),
            };
            println!("{}", output::render_record(&report, format));

            if !healthy {
                return Err(AppError::internal("Cache backend is unhealthy"));
            }
        }
    }

    Ok(())
}
