//! In-process user repository keyed by email.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use keygate_core::error::AppError;
use keygate_core::models::User;
use keygate_core::result::AppResult;
use keygate_core::traits::UserRepository;

/// Users held in memory, for single-node deployments and tests.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether no user is stored.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(AppError::bad_request("email already registered").with_field("email"));
        }
        users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn update_mfa_secret(&self, email: &str, secret: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(email)
            .ok_or_else(|| AppError::not_found(format!("no user with email {email}")))?;
        user.mfa_secret = Some(secret.to_string());
        Ok(())
    }
}
