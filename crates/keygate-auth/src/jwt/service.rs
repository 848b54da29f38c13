//! Token issuance and validation facade.

use chrono::{DateTime, Utc};

use keygate_core::config::AuthConfig;

use super::claims::{AccessClaims, RefreshClaims};
use super::decoder::JwtDecoder;
use super::encoder::{JwtEncoder, TokenPair};
use crate::error::TokenError;

/// Issues and validates signed access/refresh token pairs.
///
/// Built once from [`AuthConfig`]; the configured TTLs are used by
/// [`issue`](Self::issue), while [`generate_token_pair`](Self::generate_token_pair)
/// takes them explicitly.
#[derive(Debug, Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    access_ttl_minutes: u64,
    refresh_ttl_minutes: u64,
}

impl TokenService {
    /// Creates a new token service from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
            access_ttl_minutes: config.access_ttl_minutes,
            refresh_ttl_minutes: config.refresh_ttl_minutes,
        }
    }

    /// Mints a pair with the configured TTLs.
    pub fn issue(&self, email: &str) -> Result<TokenPair, TokenError> {
        self.issue_at(email, Utc::now())
    }

    /// Mints a pair with the configured TTLs as of `now`.
    pub fn issue_at(&self, email: &str, now: DateTime<Utc>) -> Result<TokenPair, TokenError> {
        self.encoder.generate_token_pair_at(
            email,
            self.access_ttl_minutes,
            self.refresh_ttl_minutes,
            now,
        )
    }

    /// Mints a pair with explicit TTLs.
    pub fn generate_token_pair(
        &self,
        email: &str,
        access_ttl_minutes: u64,
        refresh_ttl_minutes: u64,
    ) -> Result<TokenPair, TokenError> {
        self.encoder
            .generate_token_pair(email, access_ttl_minutes, refresh_ttl_minutes)
    }

    /// Validates an access token against the current time.
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.decoder.validate_access_token(token)
    }

    /// Validates an access token as of `now`.
    pub fn validate_access_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessClaims, TokenError> {
        self.decoder.validate_access_token_at(token, now)
    }

    /// Validates a refresh token against the current time.
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.decoder.validate_refresh_token(token)
    }

    /// Validates a refresh token as of `now`.
    pub fn validate_refresh_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshClaims, TokenError> {
        self.decoder.validate_refresh_token_at(token, now)
    }
}
