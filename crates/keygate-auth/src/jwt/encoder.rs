//! JWT token creation with per-kind signing secrets.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use keygate_core::config::AuthConfig;

use super::claims::{AccessClaims, RefreshClaims, TokenKind};
use crate::error::TokenError;

/// Creates signed access and refresh tokens (HS256).
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC key for access tokens.
    access_key: EncodingKey,
    /// HMAC key for refresh tokens.
    refresh_key: EncodingKey,
    /// Issuer label written into every token.
    issuer: String,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

/// Result of one issuance. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token.
    pub access_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Access token identifier.
    pub access_uuid: Uuid,
    /// Signed refresh token.
    pub refresh_token: String,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
    /// Refresh token identifier.
    pub refresh_uuid: Uuid,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            issuer: config.issuer.clone(),
        }
    }

    /// Generates a new access + refresh token pair for `email`.
    pub fn generate_token_pair(
        &self,
        email: &str,
        access_ttl_minutes: u64,
        refresh_ttl_minutes: u64,
    ) -> Result<TokenPair, TokenError> {
        self.generate_token_pair_at(email, access_ttl_minutes, refresh_ttl_minutes, Utc::now())
    }

    /// Same as [`generate_token_pair`](Self::generate_token_pair) with an explicit clock.
    pub fn generate_token_pair_at(
        &self,
        email: &str,
        access_ttl_minutes: u64,
        refresh_ttl_minutes: u64,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, TokenError> {
        let access_expires_at = expiry(now, access_ttl_minutes, TokenKind::Access)?;
        let refresh_expires_at = expiry(now, refresh_ttl_minutes, TokenKind::Refresh)?;

        let access_claims = AccessClaims {
            email: email.to_string(),
            access_uuid: Uuid::new_v4(),
            iss: self.issuer.clone(),
            exp: access_expires_at.timestamp(),
        };

        let refresh_claims = RefreshClaims {
            email: email.to_string(),
            refresh_uuid: Uuid::new_v4(),
            iss: self.issuer.clone(),
            exp: refresh_expires_at.timestamp(),
        };

        let access_token = encode(&Header::default(), &access_claims, &self.access_key)
            .map_err(|e| TokenError::Signing {
                kind: TokenKind::Access,
                reason: e.to_string(),
            })?;

        let refresh_token = encode(&Header::default(), &refresh_claims, &self.refresh_key)
            .map_err(|e| TokenError::Signing {
                kind: TokenKind::Refresh,
                reason: e.to_string(),
            })?;

        Ok(TokenPair {
            access_token,
            access_expires_at,
            access_uuid: access_claims.access_uuid,
            refresh_token,
            refresh_expires_at,
            refresh_uuid: refresh_claims.refresh_uuid,
        })
    }
}

/// `now + minutes`, or an error when the sum leaves chrono's range.
fn expiry(
    now: DateTime<Utc>,
    minutes: u64,
    kind: TokenKind,
) -> Result<DateTime<Utc>, TokenError> {
    i64::try_from(minutes)
        .ok()
        .and_then(Duration::try_minutes)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(TokenError::TtlOutOfRange { kind, minutes })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> JwtEncoder {
        JwtEncoder::new(&AuthConfig {
            access_secret: "access-secret-for-tests".to_string(),
            refresh_secret: "refresh-secret-for-tests".to_string(),
            ..AuthConfig::default()
        })
    }

    #[test]
    fn test_expiry_adds_minutes() {
        let now = Utc::now();
        assert_eq!(
            expiry(now, 15, TokenKind::Access).unwrap(),
            now + Duration::minutes(15)
        );
    }

    #[test]
    fn test_huge_ttl_is_an_error() {
        let encoder = encoder();
        let now = Utc::now();

        for minutes in [u64::MAX, 1 << 60, i64::MAX as u64] {
            let err = encoder
                .generate_token_pair_at("alice@example.com", minutes, minutes, now)
                .unwrap_err();
            assert_eq!(
                err,
                TokenError::TtlOutOfRange {
                    kind: TokenKind::Access,
                    minutes
                }
            );
        }

        let err = encoder
            .generate_token_pair_at("alice@example.com", 15, u64::MAX, now)
            .unwrap_err();
        assert!(matches!(
            err,
            TokenError::TtlOutOfRange {
                kind: TokenKind::Refresh,
                ..
            }
        ));
    }
}
