//! # Health Check Handler

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::web::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    queue: bool,
    store: bool,
    timestamp: String,
}

/// Backend reachability: GET /health
///
/// 200 when both the queue and the store answer, 503 otherwise.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let report = state.service.health().await;
    let (status_code, status) = if report.is_healthy() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            queue: report.queue,
            store: report.store,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
}
