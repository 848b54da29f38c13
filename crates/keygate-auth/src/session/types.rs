//! Request and response shapes of the authentication use cases.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use keygate_core::error::AppError;
use keygate_core::models::User;

use crate::jwt::TokenPair;

/// New account details.
#[derive(Clone, Deserialize)]
pub struct SignUpRequest {
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Credentials for a login.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Current TOTP code, required when MFA is enabled.
    #[serde(default)]
    pub mfa_code: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("mfa_code", &self.mfa_code.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Body of a refresh call.
#[derive(Clone, Deserialize)]
pub struct RefreshRequest {
    /// Signed refresh token.
    pub refresh_token: String,
}

impl RefreshRequest {
    /// Parses a JSON body; anything unparsable is `BadRequest`.
    pub fn from_json(body: &str) -> Result<Self, AppError> {
        serde_json::from_str(body).map_err(|e| {
            AppError::bad_request(format!("invalid refresh request: {e}"))
                .with_field("refresh_token")
        })
    }
}

impl fmt::Debug for RefreshRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshRequest").finish_non_exhaustive()
    }
}

/// Token wire shape returned by login and refresh.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed access token.
    pub access_token: String,
    /// Signed refresh token.
    pub refresh_token: String,
}

impl From<&TokenPair> for TokenResponse {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
        }
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse").finish_non_exhaustive()
    }
}

/// The caller behind an authorized request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Owner of the session.
    pub user_id: Uuid,
    /// Subject email of the access token.
    pub email: String,
    /// Identifier of the presented access token.
    pub access_uuid: Uuid,
}

/// Result of a sign-up.
#[derive(Clone, Serialize)]
pub struct SignUpOutcome {
    /// The persisted user.
    pub user: User,
    /// Base64 PNG of the MFA provisioning code, shown once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_image: Option<String>,
    /// Whether the sign-up event reached the publisher.
    pub notification_published: bool,
}

impl fmt::Debug for SignUpOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpOutcome")
            .field("user", &self.user)
            .field("qr_image", &self.qr_image.as_ref().map(|_| "[REDACTED]"))
            .field("notification_published", &self.notification_published)
            .finish()
    }
}
