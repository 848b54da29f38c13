//! Component-level error types and their mapping into [`AppError`].

use keygate_core::error::{AppError, ErrorKind};
use thiserror::Error;

use crate::jwt::claims::TokenKind;

/// Failures of token issuance and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature, structure, issuer, or claim shape is wrong.
    #[error("invalid token format: {0}")]
    InvalidFormat(String),
    /// The embedded expiry lies in the past.
    #[error("{0} token expired")]
    Expired(TokenKind),
    /// The requested lifetime does not fit a timestamp.
    #[error("{kind} token TTL of {minutes} minutes is out of range")]
    TtlOutOfRange {
        /// Which token of the pair was requested.
        kind: TokenKind,
        /// Requested lifetime.
        minutes: u64,
    },
    /// The claims could not be signed.
    #[error("could not sign {kind} token: {reason}")]
    Signing {
        /// Which token of the pair failed.
        kind: TokenKind,
        /// Underlying signer message.
        reason: String,
    },
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        let kind = match err {
            TokenError::InvalidFormat(_) | TokenError::Expired(_) => ErrorKind::Unauthorized,
            TokenError::TtlOutOfRange { .. } => ErrorKind::BadRequest,
            TokenError::Signing { .. } => ErrorKind::Internal,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}

/// Failures of TOTP enrollment and verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MfaError {
    /// The stored secret is empty or contains unexpected characters.
    #[error("malformed MFA secret")]
    InvalidSecret,
    /// The submitted code is not a 6-digit number.
    #[error("malformed MFA code")]
    InvalidCode,
    /// The provisioning URI or image could not be produced.
    #[error("could not build MFA provisioning code: {0}")]
    Provisioning(String),
    /// The system clock is before the Unix epoch.
    #[error("system clock error: {0}")]
    Clock(String),
}

impl From<MfaError> for AppError {
    fn from(err: MfaError) -> Self {
        match err {
            MfaError::InvalidCode => AppError::bad_request(err.to_string()).with_field("mfa_code"),
            _ => AppError::with_source(ErrorKind::Internal, err.to_string(), err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_classification() {
        let err: AppError = TokenError::Expired(TokenKind::Access).into();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "access token expired");

        let err: AppError = TokenError::InvalidFormat("InvalidSignature".into()).into();
        assert_eq!(err.kind, ErrorKind::Unauthorized);

        let err: AppError = TokenError::Signing {
            kind: TokenKind::Refresh,
            reason: "boom".into(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::Internal);

        let err: AppError = TokenError::TtlOutOfRange {
            kind: TokenKind::Access,
            minutes: u64::MAX,
        }
        .into();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[test]
    fn test_mfa_errors_classification() {
        let err: AppError = MfaError::InvalidCode.into();
        assert_eq!(err.kind, ErrorKind::BadRequest);
        assert_eq!(err.field.as_deref(), Some("mfa_code"));

        let err: AppError = MfaError::InvalidSecret.into();
        assert_eq!(err.kind, ErrorKind::Internal);
    }
}
