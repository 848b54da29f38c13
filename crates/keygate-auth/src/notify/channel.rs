//! In-memory pub/sub for single-node deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use keygate_core::events::DomainEvent;
use keygate_core::result::AppResult;
use keygate_core::traits::EventPublisher;

/// An event together with the topic it was published on.
#[derive(Debug, Clone)]
pub struct TopicEvent {
    /// Topic name.
    pub topic: String,
    /// The published event.
    pub event: DomainEvent,
}

/// Broadcast-channel publisher, one channel per topic.
#[derive(Debug)]
pub struct ChannelPublisher {
    /// Topic name → broadcast sender
    channels: RwLock<HashMap<String, broadcast::Sender<TopicEvent>>>,
    /// Buffer size for channels
    buffer_size: usize,
}

impl ChannelPublisher {
    /// Create a publisher whose channels buffer `buffer_size` events.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            buffer_size,
        }
    }

    /// Subscribe to a topic, returns a receiver
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<TopicEvent> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);
        tx.subscribe()
    }
}

#[async_trait]
impl EventPublisher for ChannelPublisher {
    /// Events on a topic nobody subscribed to are dropped, like `PUBLISH`
    /// to a channel without listeners.
    async fn publish(&self, topic: &str, event: &DomainEvent) -> AppResult<()> {
        let channels = self.channels.read().await;
        let delivered = match channels.get(topic) {
            Some(tx) => tx
                .send(TopicEvent {
                    topic: topic.to_string(),
                    event: event.clone(),
                })
                .unwrap_or(0),
            None => 0,
        };
        debug!(topic, event_id = %event.id, receivers = delivered, "Published event");
        Ok(())
    }
}
