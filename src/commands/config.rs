//! Configuration inspection CLI commands.

use clap::{Args, Subcommand};

use keygate_cache::redis::client::mask_redis_url;
use keygate_core::config::AppConfig;
use keygate_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets omitted)
    Show,
    /// Validate the configuration and print a summary
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => println!("{}", output::render_document(config, format)),
        ConfigCommand::Validate => {
            config.validate()?;
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("Issuer", &config.auth.issuer);
            output::print_kv(
                "Token TTLs",
                &format!(
                    "access {}m, refresh {}m",
                    config.auth.access_ttl_minutes, config.auth.refresh_ttl_minutes
                ),
            );
            output::print_kv("MFA required", &config.mfa.enabled.to_string());
            output::print_kv("Cache", &config.cache.provider);
            if config.cache.provider == "redis" {
                output::print_kv("Redis", &mask_redis_url(&config.cache.redis.url));
            }
            if config.auth.access_secret.starts_with("CHANGE_ME")
                || config.auth.refresh_secret.starts_with("CHANGE_ME")
            {
                output::print_warning("Signing secrets still use placeholder values");
            }
        }
    }

    Ok(())
}
