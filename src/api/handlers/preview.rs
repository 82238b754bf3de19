//! Handlers for the preview endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::preview::PreviewResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Shows where a short code points, without redirecting or counting a click.
///
/// # Endpoint
///
/// `GET /preview/{code}`
///
/// # Response
///
/// ```json
/// {
///   "short_code": "aB3dE9",
///   "original_url": "https://openai.com/research",
///   "created_at": "2025-01-01T12:00:00Z",
///   "click_count": 42
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn preview_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PreviewResponse>, AppError> {
    let mapping = state.link_service.preview_url(&code).await?;
    Ok(Json(mapping.into()))
}

/// `GET /preview` with no code.
///
/// Delegates to the link service with an empty code so the response is the same
/// validation error as any other empty code.
pub async fn missing_code_handler(
    State(state): State<AppState>,
) -> Result<Json<PreviewResponse>, AppError> {
    let mapping = state.link_service.preview_url("").await?;
    Ok(Json(mapping.into()))
}
