use crate::DEFAULT_TTL;
use async_trait::async_trait;
use moka::future::Cache;
use shortly_core::error::{Result, StorageError};
use shortly_core::{Identifier, StorageBackend};
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// An in-process cache tier using Moka.
///
/// Entries expire [`DEFAULT_TTL`] after insertion unless configured
/// otherwise. Like the Redis tier, a put never replaces a live entry.
#[derive(Debug, Clone)]
pub struct MokaBackend {
    cache: Cache<String, String>,
}

impl MokaBackend {
    /// Creates a cache holding up to 10,000 entries with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(10_000, DEFAULT_TTL)
    }

    /// Creates a cache with a custom maximum capacity and the default TTL.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self::with_ttl(max_capacity, DEFAULT_TTL)
    }

    /// Creates a cache whose entries expire `ttl` after insertion.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }

    /// Number of live entries. May lag behind recent writes.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for MokaBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MokaBackend {
    async fn put(&self, id: &Identifier, url: &str) -> Result<()> {
        let entry = self
            .cache
            .entry(id.as_str().to_owned())
            .or_insert(url.to_owned())
            .await;

        if !entry.is_fresh() {
            debug!(id = %id, "identifier already cached in Moka");
            return Err(StorageError::Conflict(id.to_string()));
        }

        debug!(id = %id, "cached url in Moka");
        Ok(())
    }

    async fn get(&self, id: &Identifier) -> Result<Option<String>> {
        match self.cache.get(id.as_str()).await {
            Some(url) => {
                debug!(id = %id, "cache hit in Moka");
                Ok(Some(url))
            }
            None => {
                trace!(id = %id, "cache miss in Moka");
                Ok(None)
            }
        }
    }
}

/// Configuration for creating a [`MokaBackend`] with custom settings.
#[derive(Debug, TypedBuilder)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default = 10_000)]
    max_capacity: u64,
    /// Time-to-live for cache entries.
    #[builder(default = DEFAULT_TTL)]
    ttl: Duration,
    /// Time-to-idle for cache entries.
    #[builder(default, setter(strip_option))]
    tti: Option<Duration>,
}

impl From<CacheConfig> for MokaBackend {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl);

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        MokaBackend {
            cache: builder.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identifier {
        Identifier::new_unchecked(s)
    }

    #[tokio::test]
    async fn cache_put_and_get() {
        let cache = MokaBackend::new();
        let key = id("abcdefghijUuY29t");

        assert!(cache.get(&key).await.unwrap().is_none());

        cache.put(&key, "http://example.com").await.unwrap();

        let url = cache.get(&key).await.unwrap();
        assert_eq!(url.as_deref(), Some("http://example.com"));
    }

    #[tokio::test]
    async fn cache_put_keeps_existing_entry() {
        let cache = MokaBackend::new();
        let key = id("abcdefghijUuY29t");

        cache.put(&key, "http://example.com").await.unwrap();
        let err = cache.put(&key, "http://other.com").await.unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));
        assert_eq!(
            cache.get(&key).await.unwrap().as_deref(),
            Some("http://example.com")
        );
    }

    #[tokio::test]
    async fn cache_with_ttl_expires() {
        let cache = MokaBackend::with_ttl(100, Duration::from_millis(50));
        let key = id("abcdefghijUuY29t");

        cache.put(&key, "http://example.com").await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_entry_can_be_replaced() {
        let cache = MokaBackend::with_ttl(100, Duration::from_millis(50));
        let key = id("abcdefghijUuY29t");

        cache.put(&key, "http://old.com").await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        cache.put(&key, "http://new.com").await.unwrap();
        assert_eq!(
            cache.get(&key).await.unwrap().as_deref(),
            Some("http://new.com")
        );
    }

    #[tokio::test]
    async fn cache_builder_pattern() {
        let cache: MokaBackend = MokaBackend::builder()
            .max_capacity(1000)
            .ttl(Duration::from_secs(60))
            .tti(Duration::from_secs(30))
            .build()
            .into();

        let key = id("abcdefghijUuY29t");
        cache.put(&key, "http://example.com").await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_key_is_a_miss() {
        let cache = MokaBackend::with_capacity(10);

        let url = cache.get(&id("doesnotexist0000")).await;
        assert_eq!(url, Ok(None));
    }
}
