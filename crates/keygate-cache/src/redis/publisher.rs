//! Redis pub/sub event publisher.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use keygate_core::error::{AppError, ErrorKind};
use keygate_core::events::DomainEvent;
use keygate_core::result::AppResult;
use keygate_core::traits::EventPublisher;

use super::client::RedisClient;

/// Publishes JSON-encoded domain events with Redis `PUBLISH`.
///
/// Channels carry the client's key prefix, like cache keys do.
#[derive(Debug, Clone)]
pub struct RedisEventPublisher {
    client: RedisClient,
}

impl RedisEventPublisher {
    /// Create a publisher sharing an existing client connection.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, topic: &str, event: &DomainEvent) -> AppResult<()> {
        let channel = self.client.prefixed_key(topic);
        let payload = serde_json::to_string(event)?;
        let mut conn = self.client.conn_mut();
        let receivers: i64 = conn.publish(&channel, payload).await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, format!("Redis publish failed: {e}"), e)
        })?;
        debug!(channel = %channel, event_id = %event.id, receivers, "Published event");
        Ok(())
    }
}
