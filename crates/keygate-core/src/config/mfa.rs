//! Multi-factor authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// TOTP enrollment and verification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MfaConfig {
    /// Whether every user must present a one-time code at login.
    #[serde(default)]
    pub enabled: bool,
    /// Issuer label shown by authenticator apps.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Length of the generated secret in characters.
    #[serde(default = "default_secret_length")]
    pub secret_length: usize,
}

impl MfaConfig {
    /// Rejects issuer labels that would break the provisioning URI.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.issuer.is_empty() || self.issuer.contains(':') {
            return Err(AppError::configuration(
                "MFA issuer must be non-empty and must not contain ':'",
            ));
        }
        // totp-rs refuses secrets shorter than 128 bits
        if self.secret_length < 16 {
            return Err(AppError::configuration(
                "MFA secret_length must be at least 16 characters",
            ));
        }
        Ok(())
    }
}

impl Default for MfaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            issuer: default_issuer(),
            secret_length: default_secret_length(),
        }
    }
}

fn default_issuer() -> String {
    "AuthService".to_string()
}

fn default_secret_length() -> usize {
    20
}
