//! HTTP front end for the shortly URL shortener.

pub mod app;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod model;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use metrics::HttpMetrics;
pub use state::AppState;
