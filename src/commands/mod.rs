//! CLI command definitions and dispatch.

pub mod cache;
pub mod config;
pub mod mfa;
pub mod session;
pub mod token;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use keygate_auth::SessionStore;
use keygate_cache::CacheManager;
use keygate_core::config::AppConfig;
use keygate_core::error::AppError;

use crate::output::OutputFormat;

/// Keygate: authentication and session lifecycle service
#[derive(Debug, Parser)]
#[command(name = "keygate", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded from `config/<env>.toml`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Configuration inspection
    Config(config::ConfigArgs),
    /// Issue and inspect signed tokens
    Token(token::TokenArgs),
    /// TOTP enrollment and code checks
    Mfa(mfa::MfaArgs),
    /// Inspect and revoke cached sessions
    Session(session::SessionArgs),
    /// Cache backend checks
    Cache(cache::CacheArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Config(args) => config::execute(args, config, &self.config, self.format),
            Commands::Token(args) => token::execute(args, config, self.format).await,
            Commands::Mfa(args) => mfa::execute(args, config, self.format).await,
            Commands::Session(args) => session::execute(args, config, self.format).await,
            Commands::Cache(args) => cache::execute(args, config, self.format).await,
        }
    }
}

/// Token kind selector shared by the token and session commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

/// Helper: load and validate configuration
pub fn load_config(config_path: &str, env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path, env)
}

/// Helper: connect the configured cache backend
pub async fn connect_cache(config: &AppConfig) -> Result<Arc<CacheManager>, AppError> {
    Ok(Arc::new(CacheManager::new(&config.cache).await?))
}

/// Helper: session store over the configured cache
pub async fn session_store(config: &AppConfig) -> Result<SessionStore, AppError> {
    let cache = connect_cache(config).await?;
    Ok(SessionStore::new(
        cache,
        Duration::from_millis(config.auth.call_timeout_ms),
    ))
}
