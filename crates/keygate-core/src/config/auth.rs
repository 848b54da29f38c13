//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Token signing and credential configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret for access tokens.
    #[serde(default = "default_access_secret", skip_serializing)]
    pub access_secret: String,
    /// HMAC-SHA256 secret for refresh tokens. Must differ from the access secret.
    #[serde(default = "default_refresh_secret", skip_serializing)]
    pub refresh_secret: String,
    /// `iss` claim embedded in every token.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in minutes.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_minutes: u64,
    /// Deadline applied to each repository or cache call, in milliseconds.
    #[serde(default = "default_call_timeout")]
    pub call_timeout_ms: u64,
    /// Minimum password length accepted at sign-up.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Argon2id memory cost in KiB.
    #[serde(default = "default_password_memory")]
    pub password_memory_kib: u32,
    /// Argon2id iteration count.
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
    /// Topic user events (sign-up, MFA enrollment) are published on.
    #[serde(default = "default_user_events_topic")]
    pub user_events_topic: String,
}

/// Longest accepted token lifetime (366 days).
pub const MAX_TOKEN_TTL_MINUTES: u64 = 366 * 24 * 60;

impl AuthConfig {
    /// Validates secrets and TTLs.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err(AppError::configuration("Token signing secrets must not be empty"));
        }
        if self.access_secret == self.refresh_secret {
            return Err(AppError::configuration(
                "Access and refresh tokens must be signed with different secrets",
            ));
        }
        if self.access_ttl_minutes == 0 || self.refresh_ttl_minutes == 0 {
            return Err(AppError::configuration("Token TTLs must be positive"));
        }
        if self.refresh_ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "Token TTLs must not exceed {MAX_TOKEN_TTL_MINUTES} minutes"
            )));
        }
        if self.access_ttl_minutes > self.refresh_ttl_minutes {
            return Err(AppError::configuration(
                "Access token TTL must not exceed refresh token TTL",
            ));
        }
        if self.call_timeout_ms == 0 {
            return Err(AppError::configuration("call_timeout_ms must be positive"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: default_access_secret(),
            refresh_secret: default_refresh_secret(),
            issuer: default_issuer(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_minutes: default_refresh_ttl(),
            call_timeout_ms: default_call_timeout(),
            password_min_length: default_password_min(),
            password_memory_kib: default_password_memory(),
            password_iterations: default_password_iterations(),
            user_events_topic: default_user_events_topic(),
        }
    }
}

// Secrets never appear in Debug output.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_secret", &"****")
            .field("refresh_secret", &"****")
            .field("issuer", &self.issuer)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_minutes", &self.refresh_ttl_minutes)
            .field("call_timeout_ms", &self.call_timeout_ms)
            .field("password_min_length", &self.password_min_length)
            .field("password_memory_kib", &self.password_memory_kib)
            .field("password_iterations", &self.password_iterations)
            .field("user_events_topic", &self.user_events_topic)
            .finish()
    }
}

fn default_access_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

fn default_refresh_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

fn default_issuer() -> String {
    "AuthService".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    1440
}

fn default_call_timeout() -> u64 {
    2000
}

fn default_password_min() -> usize {
    8
}

fn default_password_memory() -> u32 {
    19 * 1024
}

fn default_password_iterations() -> u32 {
    2
}

fn default_user_events_topic() -> String {
    "user.events".to_string()
}
