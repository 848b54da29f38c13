//! Cache-backed tracking of live token identifiers.
//!
//! A token is live for authorization only while its identifier has an
//! entry here. Entries expire on their own when the token does; logout and
//! refresh remove them early.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use keygate_cache::keys;
use keygate_core::error::AppError;
use keygate_core::result::AppResult;
use keygate_core::traits::CacheProvider;

use crate::deadline::with_deadline;
use crate::jwt::TokenPair;

/// Session entries over a TTL-capable cache, one deadline per call.
#[derive(Debug, Clone)]
pub struct SessionStore {
    cache: Arc<dyn CacheProvider>,
    timeout: Duration,
}

impl SessionStore {
    /// Creates a store over `cache`, bounding each call by `timeout`.
    pub fn new(cache: Arc<dyn CacheProvider>, timeout: Duration) -> Self {
        Self { cache, timeout }
    }

    /// Upserts `key` with an expiry.
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        with_deadline(self.timeout, "session set", self.cache.set(key, value, ttl)).await
    }

    /// Reads `key`, failing with `NotFound` if it is absent or expired.
    pub async fn get(&self, key: &str) -> AppResult<String> {
        with_deadline(self.timeout, "session get", self.cache.get(key))
            .await?
            .ok_or_else(|| AppError::not_found("session not found"))
    }

    /// Removes `key`. Returns whether it was present; absence is not an error.
    pub async fn delete(&self, key: &str) -> AppResult<bool> {
        with_deadline(self.timeout, "session delete", self.cache.delete(key)).await
    }

    /// Records both identifiers of a freshly issued pair as owned by `user_id`.
    ///
    /// Each entry lives exactly as long as its token, but at least one second.
    pub async fn register(
        &self,
        pair: &TokenPair,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let owner = user_id.to_string();

        self.set(
            &keys::access_session(pair.access_uuid),
            &owner,
            remaining(pair.access_expires_at, now),
        )
        .await?;
        self.set(
            &keys::refresh_session(pair.refresh_uuid),
            &owner,
            remaining(pair.refresh_expires_at, now),
        )
        .await?;

        debug!(
            user_id = %user_id,
            access_uuid = %pair.access_uuid,
            refresh_uuid = %pair.refresh_uuid,
            "Registered session entries"
        );
        Ok(())
    }

    /// Owner of a live access session, `None` once revoked or expired.
    pub async fn access_owner(&self, access_uuid: Uuid) -> AppResult<Option<Uuid>> {
        self.owner(&keys::access_session(access_uuid)).await
    }

    /// Owner of a live refresh session, `None` once consumed or expired.
    pub async fn refresh_owner(&self, refresh_uuid: Uuid) -> AppResult<Option<Uuid>> {
        self.owner(&keys::refresh_session(refresh_uuid)).await
    }

    /// Drops an access session. Returns whether it was live.
    pub async fn revoke_access(&self, access_uuid: Uuid) -> AppResult<bool> {
        self.delete(&keys::access_session(access_uuid)).await
    }

    /// Drops a refresh session. Of several concurrent callers for the same
    /// identifier, only one gets `true`.
    pub async fn consume_refresh(&self, refresh_uuid: Uuid) -> AppResult<bool> {
        self.delete(&keys::refresh_session(refresh_uuid)).await
    }

    async fn owner(&self, key: &str) -> AppResult<Option<Uuid>> {
        match self.get(key).await {
            Ok(value) => Uuid::parse_str(&value).map(Some).map_err(|e| {
                AppError::internal(format!("Corrupt session entry for {key}: {e}"))
            }),
            Err(e) if e.kind == keygate_core::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn remaining(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let seconds = (expires_at - now).num_seconds().max(1);
    Duration::from_secs(seconds as u64)
}
