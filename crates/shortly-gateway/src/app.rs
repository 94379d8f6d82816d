use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    echo_handler, health_handler, recent_handler, redirect_handler, root_handler,
    shorten_handler,
};
use crate::metrics::{metrics_handler, track_metrics};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/-/health", get(health_handler))
            .route("/-/recent", get(recent_handler))
            .route("/-/metrics", get(metrics_handler))
            .route("/", get(root_handler).post(shorten_handler))
            .route("/{id}", get(redirect_handler))
            .route("/echo/{id}", get(echo_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), track_metrics))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
