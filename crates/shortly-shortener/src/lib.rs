//! URL shortener service implementation.
//!
//! [`ShortenerService`] ties an identifier [`Generator`] to a store of
//! record and an optional cache tier, using cache-aside reads and writes.
//!
//! [`Generator`]: shortly_generator::Generator

pub mod error;
pub mod metrics;
pub mod service;
pub mod shortener;

pub use error::ServiceError;
pub use metrics::ServiceMetrics;
pub use service::{ShortenerService, MAX_RECENT};
pub use shortener::Shortener;
