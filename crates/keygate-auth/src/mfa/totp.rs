//! TOTP secrets, provisioning codes, and code checks.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use rand::distributions::Alphanumeric;
use totp_rs::{Algorithm, TOTP};

use keygate_core::config::MfaConfig;

use crate::error::MfaError;

const DIGITS: usize = 6;
const STEP_SECONDS: u64 = 30;
/// Only the current window is accepted.
const SKEW: u8 = 0;

/// Output of a fresh enrollment. Shown to the user once.
#[derive(Clone)]
pub struct Enrollment {
    /// Raw secret to persist on the user record.
    pub secret: String,
    /// `otpauth://totp/...` URI carrying the base32 secret.
    pub provisioning_uri: String,
    /// PNG rendering of the provisioning URI.
    pub qr_png: Vec<u8>,
}

impl Enrollment {
    /// The PNG image as standard base64, for JSON payloads and mail attachments.
    pub fn qr_base64(&self) -> String {
        STANDARD.encode(&self.qr_png)
    }
}

impl fmt::Debug for Enrollment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enrollment")
            .field("secret", &"[REDACTED]")
            .field("provisioning_uri", &"[REDACTED]")
            .field("qr_png_bytes", &self.qr_png.len())
            .finish()
    }
}

/// Generates per-user TOTP secrets and verifies submitted codes.
#[derive(Debug, Clone)]
pub struct MfaService {
    issuer: String,
    secret_length: usize,
}

impl MfaService {
    /// Creates the service from MFA configuration.
    pub fn new(config: &MfaConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            secret_length: config.secret_length,
        }
    }

    /// Generates a random secret for `email` and renders its provisioning code.
    pub fn generate_secret(&self, email: &str) -> Result<Enrollment, MfaError> {
        let secret: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.secret_length)
            .map(char::from)
            .collect();

        let totp = TOTP::new(
            Algorithm::SHA1,
            DIGITS,
            SKEW,
            STEP_SECONDS,
            secret.as_bytes().to_vec(),
            Some(self.issuer.clone()),
            email.to_string(),
        )
        .map_err(|e| MfaError::Provisioning(e.to_string()))?;

        let provisioning_uri = totp.get_url();
        let qr_png = totp.get_qr_png().map_err(MfaError::Provisioning)?;

        Ok(Enrollment {
            secret,
            provisioning_uri,
            qr_png,
        })
    }

    /// Checks `code` against the current time window of `secret`.
    ///
    /// A wrong code is `Ok(false)`; only malformed input is an error.
    pub fn validate_code(&self, code: &str, secret: &str) -> Result<bool, MfaError> {
        let totp = Self::verifier(code, secret)?;
        totp.check_current(code)
            .map_err(|e| MfaError::Clock(e.to_string()))
    }

    /// Checks `code` against the window containing `unix_time`.
    pub fn validate_code_at(
        &self,
        code: &str,
        secret: &str,
        unix_time: u64,
    ) -> Result<bool, MfaError> {
        let totp = Self::verifier(code, secret)?;
        Ok(totp.check(code, unix_time))
    }

    /// The code for the current window of `secret`.
    pub fn current_code(&self, secret: &str) -> Result<String, MfaError> {
        Self::check_secret(secret)?;
        Self::totp(secret)
            .generate_current()
            .map_err(|e| MfaError::Clock(e.to_string()))
    }

    fn verifier(code: &str, secret: &str) -> Result<TOTP, MfaError> {
        if code.len() != DIGITS || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MfaError::InvalidCode);
        }
        Self::check_secret(secret)?;
        Ok(Self::totp(secret))
    }

    fn check_secret(secret: &str) -> Result<(), MfaError> {
        if secret.is_empty() || !secret.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(MfaError::InvalidSecret);
        }
        Ok(())
    }

    fn totp(secret: &str) -> TOTP {
        TOTP::new_unchecked(
            Algorithm::SHA1,
            DIGITS,
            SKEW,
            STEP_SECONDS,
            secret.as_bytes().to_vec(),
            None,
            String::new(),
        )
    }
}
