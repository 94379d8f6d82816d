use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shortly_shortener::ServiceError;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    UnsupportedMediaType,
    BadRequest(String),
    NotFound,
    Service(ServiceError),
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response(),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            AppError::NotFound => StatusCode::NOT_FOUND.into_response(),
            AppError::Service(ServiceError::Unsupported) => {
                StatusCode::NOT_IMPLEMENTED.into_response()
            }
            AppError::Service(err) => {
                error!(error = %err, "shortener service failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
