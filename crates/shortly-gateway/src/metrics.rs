//! Prometheus instrumentation of the HTTP surface.
//!
//! Requests are labelled with the matched route template, never the raw
//! path, so identifiers do not become label values.

use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use tracing::error;

use crate::state::AppState;

const REQUEST_DURATION_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0];

/// Request metrics plus the registry they are exposed from.
#[derive(Clone)]
pub struct HttpMetrics {
    registry: Registry,
    request_duration: HistogramVec,
    request_status: IntCounterVec,
    request_total: IntCounter,
}

impl HttpMetrics {
    /// Creates the request metrics and registers them with `registry`.
    ///
    /// `/-/metrics` serves everything in `registry`, including metrics
    /// registered by other components.
    pub fn register(registry: &Registry) -> prometheus::Result<Self> {
        let request_duration = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "Duration of HTTP requests.")
                .buckets(REQUEST_DURATION_BUCKETS.to_vec()),
            &["path", "method", "status"],
        )?;
        let request_status = IntCounterVec::new(
            Opts::new("http_request_status", "Number of HTTP responses by status class."),
            &["path", "method", "status"],
        )?;
        let request_total = IntCounter::new("http_request_total", "Number of HTTP requests.")?;

        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(request_status.clone()))?;
        registry.register(Box::new(request_total.clone()))?;

        Ok(Self {
            registry: registry.clone(),
            request_duration,
            request_status,
            request_total,
        })
    }

    pub fn observe(&self, path: &str, method: &str, status: StatusCode, elapsed: Duration) {
        let class = status_class(status);
        self.request_duration
            .with_label_values(&[path, method, class.as_str()])
            .observe(elapsed.as_secs_f64());
        self.request_status
            .with_label_values(&[path, method, class.as_str()])
            .inc();
        self.request_total.inc();
    }

    /// Renders the registry in the Prometheus text format.
    pub fn encode(&self) -> prometheus::Result<String> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

/// `200` becomes `2xx`.
fn status_class(status: StatusCode) -> String {
    format!("{}xx", status.as_u16() / 100)
}

/// Records every routed request in the state's [`HttpMetrics`].
pub async fn track_metrics(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(metrics) = state.metrics().cloned() else {
        return next.run(request).await;
    };

    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = request.method().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    metrics.observe(&path, method.as_str(), response.status(), start.elapsed());
    response
}

pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    let Some(metrics) = state.metrics() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_reported_by_class() {
        assert_eq!(status_class(StatusCode::OK), "2xx");
        assert_eq!(status_class(StatusCode::MOVED_PERMANENTLY), "3xx");
        assert_eq!(status_class(StatusCode::NOT_FOUND), "4xx");
        assert_eq!(status_class(StatusCode::NOT_IMPLEMENTED), "5xx");
    }

    #[test]
    fn observe_updates_all_request_metrics() {
        let metrics = HttpMetrics::register(&Registry::new()).unwrap();

        metrics.observe("/{id}", "GET", StatusCode::MOVED_PERMANENTLY, Duration::from_millis(3));
        metrics.observe("/{id}", "GET", StatusCode::NOT_FOUND, Duration::from_millis(2));

        assert_eq!(metrics.request_total.get(), 2);
        assert_eq!(
            metrics
                .request_status
                .with_label_values(&["/{id}", "GET", "3xx"])
                .get(),
            1
        );
        assert_eq!(
            metrics
                .request_duration
                .with_label_values(&["/{id}", "GET", "4xx"])
                .get_sample_count(),
            1
        );
    }
}
