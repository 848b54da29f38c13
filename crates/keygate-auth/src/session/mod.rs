//! Session tracking and the authentication use cases.

pub mod bearer;
pub mod manager;
pub mod store;
pub mod types;

pub use bearer::extract_bearer_token;
pub use manager::AuthManager;
pub use store::SessionStore;
pub use types::{
    LoginRequest, Principal, RefreshRequest, SignUpOutcome, SignUpRequest, TokenResponse,
};
