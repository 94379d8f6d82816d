use prometheus::{IntCounterVec, Opts, Registry};

/// `datastore` label of the store of record.
pub const PRIMARY: &str = "primary";
/// `datastore` label of the cache tier.
pub const CACHE: &str = "cache";

/// Prometheus counters maintained by [`ShortenerService`].
///
/// Every counter carries a `datastore` label, either [`PRIMARY`] or
/// [`CACHE`].
///
/// [`ShortenerService`]: crate::ShortenerService
#[derive(Clone)]
pub struct ServiceMetrics {
    datastore_errors: IntCounterVec,
    cache_hits: IntCounterVec,
    cache_misses: IntCounterVec,
}

impl ServiceMetrics {
    /// Creates the counters and registers them with `registry`.
    pub fn register(registry: &Registry) -> prometheus::Result<Self> {
        let datastore_errors = IntCounterVec::new(
            Opts::new(
                "datastore_errors",
                "Number of errors encountered by datastore",
            ),
            &["datastore"],
        )?;
        let cache_hits = IntCounterVec::new(
            Opts::new("cache_hits", "Number of cache hits by datastore"),
            &["datastore"],
        )?;
        let cache_misses = IntCounterVec::new(
            Opts::new("cache_misses", "Number of cache misses by datastore"),
            &["datastore"],
        )?;

        registry.register(Box::new(datastore_errors.clone()))?;
        registry.register(Box::new(cache_hits.clone()))?;
        registry.register(Box::new(cache_misses.clone()))?;

        Ok(Self {
            datastore_errors,
            cache_hits,
            cache_misses,
        })
    }

    pub(crate) fn datastore_error(&self, datastore: &str) {
        self.datastore_errors.with_label_values(&[datastore]).inc();
    }

    pub(crate) fn cache_hit(&self) {
        self.cache_hits.with_label_values(&[CACHE]).inc();
    }

    pub(crate) fn cache_miss(&self) {
        self.cache_misses.with_label_values(&[CACHE]).inc();
    }

    pub fn datastore_errors(&self, datastore: &str) -> u64 {
        self.datastore_errors.with_label_values(&[datastore]).get()
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.with_label_values(&[CACHE]).get()
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.with_label_values(&[CACHE]).get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::TextEncoder;

    #[test]
    fn registers_all_counters() {
        let registry = Registry::new();
        let metrics = ServiceMetrics::register(&registry).unwrap();

        metrics.cache_hit();
        metrics.cache_miss();
        metrics.datastore_error(PRIMARY);

        let text = TextEncoder::new()
            .encode_to_string(&registry.gather())
            .unwrap();
        assert!(text.contains("datastore_errors{datastore=\"primary\"} 1"));
        assert!(text.contains("cache_hits{datastore=\"cache\"} 1"));
        assert!(text.contains("cache_misses{datastore=\"cache\"} 1"));
        assert_eq!(metrics.datastore_errors(PRIMARY), 1);
        assert_eq!(metrics.datastore_errors(CACHE), 0);
    }

    #[test]
    fn registering_twice_on_one_registry_fails() {
        let registry = Registry::new();
        ServiceMetrics::register(&registry).unwrap();

        assert!(ServiceMetrics::register(&registry).is_err());
    }
}
