use std::sync::Arc;

use shortly_shortener::Shortener;

use crate::metrics::HttpMetrics;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    base_url: Option<String>,
    metrics: Option<HttpMetrics>,
}

impl AppState {
    /// Short urls are built from the request's `Host` header.
    pub fn new(shortener: Arc<dyn Shortener>) -> Self {
        Self {
            shortener,
            base_url: None,
            metrics: None,
        }
    }

    /// Short urls are built from a fixed public base url.
    pub fn with_base_url(shortener: Arc<dyn Shortener>, base_url: impl Into<String>) -> Self {
        Self {
            shortener,
            base_url: Some(base_url.into()),
            metrics: None,
        }
    }

    /// Records request metrics and serves them on `/-/metrics`.
    pub fn with_metrics(mut self, metrics: HttpMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn metrics(&self) -> Option<&HttpMetrics> {
        self.metrics.as_ref()
    }
}
