//! Cache tiers for the shortly URL shortener.
//!
//! Both caches implement [`StorageBackend`](shortly_core::StorageBackend) so
//! they can be placed in front of a store of record. Entries expire after a
//! backend-specific TTL and are never the source of truth.

pub mod moka;
pub mod redis;

use std::time::Duration;

pub use self::moka::{CacheConfig, MokaBackend};
pub use self::redis::RedisBackend;

/// Default lifetime of a cached url.
pub const DEFAULT_TTL: Duration = Duration::from_secs(12 * 60 * 60);
