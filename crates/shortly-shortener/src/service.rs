use crate::error::{Result, ServiceError};
use crate::metrics::{ServiceMetrics, CACHE, PRIMARY};
use crate::shortener::Shortener;
use async_trait::async_trait;
use shortly_core::{Identifier, StorageBackend, StorageError, UrlRecord};
use shortly_generator::{Generator, UrlIdGenerator};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Upper bound on the number of records returned by [`Shortener::recent`].
pub const MAX_RECENT: usize = 10;

/// A concrete implementation of the [`Shortener`] trait.
///
/// The service wraps a store of record, an optional cache tier and a
/// [`Generator`]:
/// - `save` writes to the store of record, then to the cache.
/// - `resolve` reads the cache first and falls back to the store of record.
///   Cache errors are treated as misses, and a fallback hit is not written
///   back to the cache.
///
/// # Save contract
///
/// `save` is not atomic across tiers. If the cache write fails after the
/// store of record accepted the url, `save` returns [`ServiceError::Cache`]
/// even though the record is persisted and resolvable.
///
/// No collision retry is performed: a generated identifier that already
/// exists makes the store of record reject the write.
///
/// With [`ShortenerService::with_metrics`], cache hits, cache misses and
/// datastore errors are counted.
pub struct ShortenerService<P, G = UrlIdGenerator> {
    primary: Arc<P>,
    cache: Option<Arc<dyn StorageBackend>>,
    generator: Arc<G>,
    metrics: Option<ServiceMetrics>,
}

impl<P, G> Clone for ShortenerService<P, G> {
    fn clone(&self) -> Self {
        Self {
            primary: Arc::clone(&self.primary),
            cache: self.cache.clone(),
            generator: Arc::clone(&self.generator),
            metrics: self.metrics.clone(),
        }
    }
}

impl<P: StorageBackend, G: Generator> ShortenerService<P, G> {
    /// Creates a service backed only by the store of record.
    pub fn new(primary: P, generator: G) -> Self {
        Self {
            primary: Arc::new(primary),
            cache: None,
            generator: Arc::new(generator),
            metrics: None,
        }
    }

    /// Creates a service with a cache tier in front of the store of record.
    pub fn with_cache<C: StorageBackend>(primary: P, cache: C, generator: G) -> Self {
        Self {
            primary: Arc::new(primary),
            cache: Some(Arc::new(cache)),
            generator: Arc::new(generator),
            metrics: None,
        }
    }

    /// Counts cache and datastore outcomes in `metrics`.
    pub fn with_metrics(mut self, metrics: ServiceMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Whether a cache tier is configured.
    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Returns a reference to the store of record.
    pub fn primary(&self) -> &P {
        &self.primary
    }

    fn record(&self, f: impl FnOnce(&ServiceMetrics)) {
        if let Some(metrics) = &self.metrics {
            f(metrics);
        }
    }

    fn primary_error(&self, err: StorageError) -> ServiceError {
        self.record(|m| m.datastore_error(PRIMARY));
        ServiceError::Storage(err)
    }
}

#[async_trait]
impl<P: StorageBackend, G: Generator> Shortener for ShortenerService<P, G> {
    async fn save(&self, url: &str) -> Result<Identifier> {
        let id = self.generator.generate(url);
        trace!(id = %id, "generated identifier");

        self.primary
            .put(&id, url)
            .await
            .map_err(|e| self.primary_error(e))?;
        debug!(id = %id, "stored url in primary store");

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&id, url).await {
                warn!(id = %id, error = %e, "cache write failed after primary write");
                self.record(|m| m.datastore_error(CACHE));
                return Err(ServiceError::Cache(e));
            }
            debug!(id = %id, "stored url in cache");
        }

        Ok(id)
    }

    async fn resolve(&self, id: &Identifier) -> Result<Option<String>> {
        if let Some(cache) = &self.cache {
            match cache.get(id).await {
                Ok(Some(url)) => {
                    debug!(id = %id, "resolved from cache");
                    self.record(ServiceMetrics::cache_hit);
                    return Ok(Some(url));
                }
                Ok(None) => {
                    trace!(id = %id, "cache miss");
                    self.record(ServiceMetrics::cache_miss);
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "cache lookup failed, treating as miss");
                    self.record(|m| {
                        m.datastore_error(CACHE);
                        m.cache_miss();
                    });
                }
            }
        }

        let url = self
            .primary
            .get(id)
            .await
            .map_err(|e| self.primary_error(e))?;

        match &url {
            Some(_) => debug!(id = %id, "resolved from primary store"),
            None => trace!(id = %id, "identifier not found"),
        }

        Ok(url)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<UrlRecord>> {
        let recent = self.primary.as_recent().ok_or(ServiceError::Unsupported)?;

        recent
            .list_recent(limit.min(MAX_RECENT))
            .await
            .map_err(|e| self.primary_error(e))
    }
}
