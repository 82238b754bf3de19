//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service liveness with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: The store or the click queue is down
///
/// # Response
///
/// ```json
/// {
///   "status": "OK",
///   "message": "Server is running",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "Store reachable" },
///     "click_queue": { "status": "ok", "message": "Capacity: 10000" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store = if state.link_service.store_available().await {
        CheckStatus::ok("Store reachable")
    } else {
        CheckStatus::error("Store unreachable")
    };

    let click_queue = if state.link_service.click_queue_open() {
        CheckStatus::ok(format!(
            "Capacity: {}",
            state.link_service.click_queue_capacity()
        ))
    } else {
        CheckStatus::error("Click queue is closed")
    };

    let all_healthy = store.is_ok() && click_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "OK" } else { "DEGRADED" }.to_string(),
        message: if all_healthy {
            "Server is running"
        } else {
            "Server is running with degraded components"
        }
        .to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { store, click_queue },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
