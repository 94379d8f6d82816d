use axum::http::StatusCode;

pub async fn root_handler() -> &'static str {
    "shortly"
}

/// Platform health check; answers as soon as the server is up.
pub async fn health_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}
