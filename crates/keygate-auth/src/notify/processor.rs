//! Consumes user events and hands them to a notifier.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};

use keygate_core::events::{DomainEvent, EventPayload, UserEvent};
use keygate_core::result::AppResult;

use super::channel::TopicEvent;

/// Delivers user-facing notifications (mail, push, ...).
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Greets a freshly signed-up user, attaching the MFA code if any.
    async fn send_welcome(&self, name: &str, email: &str, qr_image: Option<&str>)
    -> AppResult<()>;

    /// Sends the provisioning code of a late MFA enrollment.
    async fn send_mfa_enrollment(&self, email: &str, qr_image: &str) -> AppResult<()>;
}

/// Notifier that only records what would have been sent.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_welcome(
        &self,
        name: &str,
        email: &str,
        qr_image: Option<&str>,
    ) -> AppResult<()> {
        info!(name, email, with_mfa_code = qr_image.is_some(), "Welcome notification");
        Ok(())
    }

    async fn send_mfa_enrollment(&self, email: &str, _qr_image: &str) -> AppResult<()> {
        info!(email, "MFA enrollment notification");
        Ok(())
    }
}

/// Dispatches events from one topic to a [`Notifier`].
#[derive(Debug, Clone)]
pub struct EventProcessor {
    topic: String,
    notifier: Arc<dyn Notifier>,
}

impl EventProcessor {
    /// Creates a processor for events published on `topic`.
    pub fn new(topic: impl Into<String>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            topic: topic.into(),
            notifier,
        }
    }

    /// Handles events until the channel closes.
    ///
    /// A failed notification is logged and processing continues.
    pub async fn run(&self, mut receiver: broadcast::Receiver<TopicEvent>) {
        info!(topic = %self.topic, "Event processor started");
        loop {
            match receiver.recv().await {
                Ok(message) if message.topic == self.topic => {
                    if let Err(e) = self.handle_event(&message.event).await {
                        error!(
                            event_id = %message.event.id,
                            recipient = message.event.recipient(),
                            error = %e,
                            "Failed to handle event"
                        );
                    }
                }
                Ok(message) => {
                    debug!(topic = %message.topic, "Ignoring event from other topic");
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event processor lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
        info!(topic = %self.topic, "Event processor stopped");
    }

    /// Handles one event.
    pub async fn handle_event(&self, event: &DomainEvent) -> AppResult<()> {
        debug!(event_id = %event.id, recipient = event.recipient(), "Dispatching notification");
        match &event.payload {
            EventPayload::User(UserEvent::SignedUp {
                name,
                email,
                qr_image,
                ..
            }) => {
                self.notifier
                    .send_welcome(name, email, qr_image.as_deref())
                    .await
            }
            EventPayload::User(UserEvent::MfaEnrolled {
                email, qr_image, ..
            }) => self.notifier.send_mfa_enrollment(email, qr_image).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use super::*;
    use crate::notify::channel::ChannelPublisher;
    use keygate_core::error::AppError;
    use keygate_core::traits::EventPublisher;

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_welcome(
            &self,
            name: &str,
            email: &str,
            qr_image: Option<&str>,
        ) -> AppResult<()> {
            if self.fail {
                return Err(AppError::internal("smtp down"));
            }
            self.sent
                .lock()
                .await
                .push(format!("welcome:{name}:{email}:{}", qr_image.is_some()));
            Ok(())
        }

        async fn send_mfa_enrollment(&self, email: &str, _qr_image: &str) -> AppResult<()> {
            self.sent.lock().await.push(format!("mfa:{email}"));
            Ok(())
        }
    }

    fn signed_up(email: &str) -> DomainEvent {
        DomainEvent::user(UserEvent::SignedUp {
            user_id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: email.to_string(),
            qr_image: Some("iVBORw0KGgo=".to_string()),
        })
    }

    #[tokio::test]
    async fn test_dispatches_by_variant() {
        let notifier = Arc::new(RecordingNotifier::default());
        let processor = EventProcessor::new("user.events", notifier.clone());

        processor
            .handle_event(&signed_up("alice@example.com"))
            .await
            .unwrap();
        processor
            .handle_event(&DomainEvent::user(UserEvent::MfaEnrolled {
                user_id: Uuid::new_v4(),
                email: "bob@example.com".to_string(),
                qr_image: "iVBORw0KGgo=".to_string(),
            }))
            .await
            .unwrap();

        let sent = notifier.sent.lock().await;
        assert_eq!(
            *sent,
            vec![
                "welcome:Alice:alice@example.com:true".to_string(),
                "mfa:bob@example.com".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_run_consumes_until_closed() {
        let publisher = ChannelPublisher::new(8);
        let receiver = publisher.subscribe("user.events").await;
        let notifier = Arc::new(RecordingNotifier::default());
        let processor = EventProcessor::new("user.events", notifier.clone());

        let handle = tokio::spawn(async move { processor.run(receiver).await });

        publisher
            .publish("user.events", &signed_up("alice@example.com"))
            .await
            .unwrap();
        drop(publisher);
        handle.await.unwrap();

        assert_eq!(notifier.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_stop_processing() {
        let publisher = ChannelPublisher::new(8);
        let receiver = publisher.subscribe("user.events").await;
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let processor = EventProcessor::new("user.events", notifier.clone());

        let handle = tokio::spawn(async move { processor.run(receiver).await });
        for _ in 0..3 {
            publisher
                .publish("user.events", &signed_up("alice@example.com"))
                .await
                .unwrap();
        }
        drop(publisher);
        handle.await.unwrap();

        assert!(notifier.sent.lock().await.is_empty());
    }
}
