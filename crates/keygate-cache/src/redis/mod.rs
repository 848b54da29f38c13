//! Redis cache provider and event publisher.

pub mod client;
pub mod operations;
pub mod publisher;

pub use client::RedisClient;
pub use operations::RedisCacheProvider;
pub use publisher::RedisEventPublisher;
