//! User identity record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user.
///
/// The record is owned by the user repository; the authentication core
/// only reads it to mint tokens and writes the MFA secret.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique email address, compared case-sensitively.
    pub email: String,
    /// Salted one-way password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// TOTP secret, present iff MFA is enrolled.
    #[serde(skip_serializing, default)]
    pub mfa_secret: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a new, not yet persisted user with a fresh identifier.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash,
            mfa_secret: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the user has completed MFA enrollment.
    pub fn has_mfa(&self) -> bool {
        self.mfa_secret.is_some()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("mfa_secret", &self.mfa_secret.as_ref().map(|_| "[REDACTED]"))
            .field("created_at", &self.created_at)
            .finish()
    }
}
