//! In-process event delivery and the user notification processor.

pub mod channel;
pub mod processor;

pub use channel::{ChannelPublisher, TopicEvent};
pub use processor::{EventProcessor, LogNotifier, Notifier};
