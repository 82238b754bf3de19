//! Router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`               - Shorten a URL
//! - `GET  /health`                - Liveness with store and click queue checks
//! - `GET  /preview/{code}`        - Mapping details without counting a click
//! - `GET  /{code}`                - Redirect to the original URL
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{
    health_handler, missing_code_handler, preview_handler, redirect_handler, shorten_handler,
};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All service routes, without middleware.
///
/// Static segments win over `/{code}`, so a short code can never shadow
/// `/health`, `/shorten` or `/preview`.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/health", get(health_handler))
        .route("/preview", get(missing_code_handler))
        .route("/preview/{code}", get(preview_handler))
        .route("/{code}", get(redirect_handler))
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = service_routes()
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
