//! # keygate-auth
//!
//! Authentication and session lifecycle for Keygate.
//!
//! ## Modules
//!
//! - `jwt`: signed access/refresh token pairs (issue and validate)
//! - `mfa`: TOTP secret enrollment and one-time code verification
//! - `session`: cache-backed session tracking and the sign-up, login,
//!   logout, and refresh flows
//! - `password`: Argon2id password hashing
//! - `repository`: in-memory user repository
//! - `notify`: in-process event channel and the user event processor

pub mod deadline;
pub mod error;
pub mod jwt;
pub mod mfa;
pub mod notify;
pub mod password;
pub mod repository;
pub mod session;

pub use error::{MfaError, TokenError};
pub use jwt::{AccessClaims, RefreshClaims, TokenPair, TokenService};
pub use mfa::{Enrollment, MfaService};
pub use notify::{ChannelPublisher, EventProcessor, Notifier};
pub use password::PasswordHasher;
pub use repository::MemoryUserRepository;
pub use session::{AuthManager, SessionStore};
