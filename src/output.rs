//! Table and JSON rendering of Keygate views for the CLI.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;
use tabled::builder::Builder;
use tabled::settings::Style;

use keygate_auth::jwt::TokenClaims;
use keygate_auth::{Enrollment, TokenPair};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One half of a token pair.
#[derive(Debug, Serialize, Tabled)]
struct TokenRow {
    /// Token kind
    kind: &'static str,
    /// Token identifier
    token_id: String,
    /// Expiry
    expires_at: String,
    /// Signed token
    token: String,
}

/// Decoded claims of a validated token.
#[derive(Debug, Serialize, Tabled)]
pub struct ClaimsView {
    /// Token kind
    kind: String,
    /// Subject email
    email: String,
    /// Token identifier
    token_id: String,
    /// Issuer
    issuer: String,
    /// Expiry
    expires_at: String,
    /// Seconds left
    remaining_secs: u64,
}

impl ClaimsView {
    /// Project validated claims as seen at `now`.
    pub fn new<C: TokenClaims>(claims: &C, now: DateTime<Utc>) -> Self {
        Self {
            kind: C::KIND.to_string(),
            email: claims.email().to_string(),
            token_id: claims.token_id().to_string(),
            issuer: claims.issuer().to_string(),
            expires_at: claims
                .expires_at()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| claims.exp().to_string()),
            remaining_secs: claims.remaining_ttl(now).as_secs(),
        }
    }
}

/// Enrollment as shown to the operator. The PNG itself is never printed.
#[derive(Debug, Serialize, Tabled)]
struct EnrollmentView<'a> {
    /// Raw secret
    secret: &'a str,
    /// otpauth URI
    provisioning_uri: &'a str,
    /// QR image size
    qr_png_bytes: usize,
}

/// Render a token pair: one row per token in a table, the pair as-is in JSON.
pub fn render_token_pair(pair: &TokenPair, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let rows = [
                TokenRow {
                    kind: "access",
                    token_id: pair.access_uuid.to_string(),
                    expires_at: pair.access_expires_at.to_rfc3339(),
                    token: pair.access_token.clone(),
                },
                TokenRow {
                    kind: "refresh",
                    token_id: pair.refresh_uuid.to_string(),
                    expires_at: pair.refresh_expires_at.to_rfc3339(),
                    token: pair.refresh_token.clone(),
                },
            ];
            let mut table = tabled::Table::new(rows);
            table.with(Style::rounded());
            table.to_string()
        }
        OutputFormat::Json => to_json(pair),
    }
}

/// Render an enrollment, reporting the QR code by size only.
pub fn render_enrollment(enrollment: &Enrollment, format: OutputFormat) -> String {
    render_record(
        &EnrollmentView {
            secret: &enrollment.secret,
            provisioning_uri: &enrollment.provisioning_uri,
            qr_png_bytes: enrollment.qr_png.len(),
        },
        format,
    )
}

/// Render a single record as a two-column field/value table, or as a JSON object.
pub fn render_record<T: Serialize + Tabled>(record: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            for (field, value) in T::headers().into_iter().zip(record.fields()) {
                builder.push_record([field.into_owned(), value.into_owned()]);
            }
            let mut table = builder.build();
            table.with(Style::rounded());
            table.to_string()
        }
        OutputFormat::Json => to_json(record),
    }
}

/// Render any serializable document. Tables fall back to the pretty `Debug` form.
pub fn render_document<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => format!("{item:#?}"),
        OutputFormat::Json => to_json(item),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
