//! # keygate-cache
//!
//! Cache provider implementations backing the session store. Supports two
//! modes:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//!   with per-entry expiry
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. The Redis
//! backend also provides an [`EventPublisher`](keygate_core::traits::EventPublisher)
//! over `PUBLISH`.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
