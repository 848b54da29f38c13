//! User repository trait consumed by the authentication core.

use async_trait::async_trait;

use crate::models::User;
use crate::result::AppResult;

/// Persistence of user identity records.
///
/// The authentication core only reads users by email, inserts new users,
/// and updates the MFA secret; everything else about the user record is
/// owned by the implementation.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Find a user by exact (case-sensitive) email.
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user record.
    async fn insert_user(&self, user: &User) -> AppResult<()>;

    /// Replace the MFA secret of the user with the given email.
    async fn update_mfa_secret(&self, email: &str, secret: &str) -> AppResult<()>;
}
