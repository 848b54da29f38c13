//! Domain events emitted by the authentication core.
//!
//! Events are published through an optional [`EventPublisher`] and
//! consumed by downstream processors (welcome mail, audit). The payload is
//! a closed set of variants; consumers dispatch with an exhaustive `match`.
//!
//! [`EventPublisher`]: crate::traits::EventPublisher

pub mod user;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use user::UserEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A user-related event.
    User(UserEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Shorthand for wrapping a user event.
    pub fn user(event: UserEvent) -> Self {
        Self::new(EventPayload::User(event))
    }

    /// Address the resulting notification goes to.
    pub fn recipient(&self) -> &str {
        match &self.payload {
            EventPayload::User(event) => event.email(),
        }
    }
}
