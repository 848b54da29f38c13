//! Core traits defined in `keygate-core` and implemented by other crates.

pub mod cache;
pub mod publisher;
pub mod repository;

pub use cache::CacheProvider;
pub use publisher::EventPublisher;
pub use repository::UserRepository;
