//! Optional event publishing capability.

use async_trait::async_trait;

use crate::events::DomainEvent;
use crate::result::AppResult;

/// Publishes domain events to downstream consumers.
///
/// This is a separate, optional dependency of the authentication core:
/// services hold an `Option<Arc<dyn EventPublisher>>` and skip publishing
/// entirely when none is configured.
#[async_trait]
pub trait EventPublisher: Send + Sync + std::fmt::Debug + 'static {
    /// Publish an event on a topic.
    async fn publish(&self, topic: &str, event: &DomainEvent) -> AppResult<()>;
}
