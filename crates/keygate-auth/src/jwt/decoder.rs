//! JWT token validation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::de::DeserializeOwned;

use keygate_core::config::AuthConfig;

use super::claims::{AccessClaims, RefreshClaims, TokenClaims};
use crate::error::TokenError;

/// Verifies signatures and expiry of access and refresh tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC key for access tokens.
    access_key: DecodingKey,
    /// HMAC key for refresh tokens.
    refresh_key: DecodingKey,
    /// Signature, algorithm, and issuer checks. Expiry is checked separately.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is compared strictly against our own clock below
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);
        validation.set_issuer(&[config.issuer.as_str()]);

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Validates an access token against the current time.
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.validate_access_token_at(token, Utc::now())
    }

    /// Validates an access token as of `now`.
    pub fn validate_access_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessClaims, TokenError> {
        self.decode_checked(token, &self.access_key, now)
    }

    /// Validates a refresh token against the current time.
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.validate_refresh_token_at(token, Utc::now())
    }

    /// Validates a refresh token as of `now`.
    pub fn validate_refresh_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshClaims, TokenError> {
        self.decode_checked(token, &self.refresh_key, now)
    }

    fn decode_checked<C>(
        &self,
        token: &str,
        key: &DecodingKey,
        now: DateTime<Utc>,
    ) -> Result<C, TokenError>
    where
        C: TokenClaims + DeserializeOwned + Clone,
    {
        let data = decode::<C>(token, key, &self.validation).map_err(|e| match e.kind() {
            JwtErrorKind::InvalidSignature => TokenError::InvalidFormat("invalid signature".into()),
            JwtErrorKind::InvalidIssuer => TokenError::InvalidFormat("unexpected issuer".into()),
            JwtErrorKind::InvalidAlgorithm => {
                TokenError::InvalidFormat("unexpected signing algorithm".into())
            }
            JwtErrorKind::MissingRequiredClaim(claim) => {
                TokenError::InvalidFormat(format!("missing claim: {claim}"))
            }
            _ => TokenError::InvalidFormat(e.to_string()),
        })?;

        let claims = data.claims;
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired(C::KIND));
        }
        Ok(claims)
    }
}
