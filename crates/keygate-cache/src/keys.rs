//! Cache key builders for session entries.
//!
//! Access and refresh identifiers live in separate namespaces so an
//! identifier of one token type can never address a session of the other.

use uuid::Uuid;

/// Cache key for the session entry of an access token.
pub fn access_session(token_id: Uuid) -> String {
    format!("session:access:{token_id}")
}

/// Cache key for the session entry of a refresh token.
pub fn refresh_session(token_id: Uuid) -> String {
    format!("session:refresh:{token_id}")
}
