//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. The loaded [`AppConfig`] is built once at startup and passed
//! by reference into service constructors.

pub mod auth;
pub mod cache;
pub mod logging;
pub mod mfa;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::cache::CacheConfig;
pub use self::logging::LoggingConfig;
pub use self::mfa::MfaConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Token and credential settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Multi-factor authentication settings.
    #[serde(default)]
    pub mfa: MfaConfig,
    /// Session cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the base file at `path`, an optional `config/{env}` overlay,
    /// and environment variables prefixed with `KEYGATE_` (sections are
    /// separated by `__`, e.g. `KEYGATE_AUTH__ACCESS_SECRET`).
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("KEYGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        tracing::debug!(path, env, cache = %config.cache.provider, "Configuration loaded");
        Ok(config)
    }

    /// Check cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;
        self.mfa.validate()?;
        match self.cache.provider.as_str() {
            "memory" | "redis" => Ok(()),
            other => Err(AppError::configuration(format!(
                "Unknown cache provider: '{other}'. Supported: memory, redis"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth.access_ttl_minutes, 15);
        assert_eq!(config.auth.refresh_ttl_minutes, 1440);
        assert!(!config.mfa.enabled);
        assert_eq!(config.cache.provider, "memory");
    }

    #[test]
    fn test_rejects_unknown_cache_provider() {
        let mut config = AppConfig::default();
        config.cache.provider = "memcached".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let raw = r#"
            [auth]
            access_secret = "a-secret"
            refresh_secret = "r-secret"
            access_ttl_minutes = 5

            [mfa]
            enabled = true
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.auth.access_ttl_minutes, 5);
        assert_eq!(config.auth.refresh_ttl_minutes, 1440);
        assert!(config.mfa.enabled);
        assert_eq!(config.mfa.issuer, "AuthService");
        assert!(config.validate().is_ok());
    }
}
