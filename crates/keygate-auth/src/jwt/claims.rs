//! JWT claims embedded in access and refresh tokens.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived, single-use token exchanged for a new pair.
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims payload of an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Subject email.
    pub email: String,
    /// Unique identifier of this issuance, used as the session key.
    pub access_uuid: Uuid,
    /// Issuer label.
    pub iss: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Claims payload of a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    /// Subject email.
    pub email: String,
    /// Unique identifier of this issuance, used as the session key.
    pub refresh_uuid: Uuid,
    /// Issuer label.
    pub iss: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Accessors shared by both claim variants.
pub trait TokenClaims {
    /// Which token of the pair these claims belong to.
    const KIND: TokenKind;

    /// Subject email.
    fn email(&self) -> &str;

    /// Unique token identifier.
    fn token_id(&self) -> Uuid;

    /// Issuer label.
    fn issuer(&self) -> &str;

    /// Expiration timestamp (seconds since epoch).
    fn exp(&self) -> i64;

    /// Returns the expiration as a `DateTime<Utc>`.
    fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp(), 0)
    }

    /// Whether the token is expired at `now`. A token whose expiry equals
    /// `now` is still valid for that instant.
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp() < now.timestamp()
    }

    /// Time left until expiry, never less than one second.
    fn remaining_ttl(&self, now: DateTime<Utc>) -> Duration {
        let remaining = self.exp() - now.timestamp();
        Duration::from_secs(remaining.max(1) as u64)
    }
}

impl TokenClaims for AccessClaims {
    const KIND: TokenKind = TokenKind::Access;

    fn email(&self) -> &str {
        &self.email
    }

    fn token_id(&self) -> Uuid {
        self.access_uuid
    }

    fn issuer(&self) -> &str {
        &self.iss
    }

    fn exp(&self) -> i64 {
        self.exp
    }
}

impl TokenClaims for RefreshClaims {
    const KIND: TokenKind = TokenKind::Refresh;

    fn email(&self) -> &str {
        &self.email
    }

    fn token_id(&self) -> Uuid {
        self.refresh_uuid
    }

    fn issuer(&self) -> &str {
        &self.iss
    }

    fn exp(&self) -> i64 {
        self.exp
    }
}
