use crate::error::{AppError, Result};
use crate::model::ShortenForm;
use crate::state::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use shortly_core::{Identifier, UrlRecord};
use shortly_shortener::MAX_RECENT;
use tracing::{debug, info};

/// Shortens the `url` field of a form-encoded body and answers with the
/// short url.
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: std::result::Result<Form<ShortenForm>, FormRejection>,
) -> Result<String> {
    let Form(form) = form.map_err(|rejection| match rejection {
        FormRejection::InvalidFormContentType(_) => AppError::UnsupportedMediaType,
        other => AppError::BadRequest(other.body_text()),
    })?;

    let url = match form.url {
        Some(url) if !url.is_empty() => url,
        _ => return Err(AppError::BadRequest("missing url".to_string())),
    };

    let id = state.shortener().save(&url).await?;
    info!(id = %id, url = %url, "shortened url");

    let base = match state.base_url() {
        Some(base) => base.to_string(),
        None => headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string(),
    };

    Ok(id.to_url(&base))
}

/// Redirects to the url saved under `id`.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    // A malformed identifier can never have been saved.
    let Ok(id) = Identifier::new(id) else {
        return Err(AppError::NotFound);
    };

    match state.shortener().resolve(&id).await? {
        Some(url) => {
            info!(id = %id, url = %url, "redirected url");
            Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, url)]).into_response())
        }
        None => {
            debug!(id = %id, "no url for identifier");
            Err(AppError::NotFound)
        }
    }
}

/// Echoes the identifier back; used to test the shorten-and-redirect flow.
pub async fn echo_handler(Path(id): Path<String>) -> String {
    format!("ID: {id}")
}

pub async fn recent_handler(State(state): State<AppState>) -> Result<Json<Vec<UrlRecord>>> {
    let records = state.shortener().recent(MAX_RECENT).await?;
    Ok(Json(records))
}
