//! Handler for the shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::{base_url, extract_host, is_encrypted, short_url};

/// Shortens a URL, or returns the existing short code for a known URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://openai.com/research" }
/// ```
///
/// # Response
///
/// `201 Created` for a new mapping, `200 OK` when the URL was already shortened:
///
/// ```json
/// {
///   "original_url": "https://openai.com/research",
///   "short_code": "aB3dE9",
///   "short_url": "http://localhost:8080/aB3dE9"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for invalid JSON, a missing `Host` header, or an
/// empty, malformed or overlong URL. Returns 500 if allocation or persistence fails.
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request("Invalid JSON", json!({ "reason": rejection.body_text() }))
    })?;
    payload.validate()?;

    let host = extract_host(&headers)?;
    let base = base_url(&host, is_encrypted(&headers, state.behind_proxy));

    let shortened = state.link_service.shorten_url(&payload.url).await?;

    let status = if shortened.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let mapping = shortened.into_mapping();
    let short_url = short_url(&base, &mapping.short_code);

    Ok((status, Json(ShortenResponse::new(mapping, short_url))))
}
