//! Time-based one-time password enrollment and verification.

pub mod totp;

pub use totp::{Enrollment, MfaService};
