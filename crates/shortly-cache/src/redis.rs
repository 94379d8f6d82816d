use crate::DEFAULT_TTL;
use async_trait::async_trait;
use redis::AsyncCommands;
use shortly_core::error::{Result, StorageError};
use shortly_core::{Identifier, StorageBackend};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// A Redis-based cache tier.
///
/// Urls are stored as plain strings under `{key_prefix}{id}` with an
/// expiry. Writes use `SET NX`, so an identifier that is already cached
/// is reported as [`StorageError::Conflict`] rather than overwritten.
#[derive(Debug, Clone)]
pub struct RedisBackend {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
    ttl: Duration,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StorageError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Operation(message)
    }
}

impl RedisBackend {
    /// Creates a new Redis cache with the default prefix and TTL.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: "shortly:url:".to_string(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Opens a multiplexed connection to `redis_url` and wraps it.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("invalid redis url", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::new(conn))
    }

    /// Uses a custom key prefix (e.g., "myapp:url:").
    pub fn with_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    /// Uses a custom entry lifetime. Sub-second TTLs are rounded up to one
    /// second.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Generates the cache key for an identifier.
    fn cache_key(&self, id: &Identifier) -> String {
        format!("{}{}", self.key_prefix, id.as_str())
    }

    fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs().max(1)
    }
}

#[async_trait]
impl StorageBackend for RedisBackend {
    async fn put(&self, id: &Identifier, url: &str) -> Result<()> {
        let key = self.cache_key(id);
        trace!(id = %id, "storing url in Redis cache");

        let mut conn = self.conn.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(url)
            .arg("NX")
            .arg("EX")
            .arg(self.ttl_secs())
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                warn!(id = %id, error = %e, "failed to cache url in Redis");
                map_redis_error("failed to write value to Redis", e)
            })?;

        match reply {
            Some(_) => {
                debug!(id = %id, "cached url in Redis");
                Ok(())
            }
            None => {
                debug!(id = %id, "identifier already cached in Redis");
                Err(StorageError::Conflict(id.to_string()))
            }
        }
    }

    async fn get(&self, id: &Identifier) -> Result<Option<String>> {
        let key = self.cache_key(id);
        trace!(id = %id, "fetching url from Redis cache");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(url)) => {
                debug!(id = %id, "cache hit in Redis");
                Ok(Some(url))
            }
            Ok(None) => {
                trace!(id = %id, "cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(id = %id, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }
}
