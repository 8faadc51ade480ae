//! Route definitions grouped by concern

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};

use crate::constants::MAX_UPLOAD_BYTES;
use crate::web::{handlers, state::AppState};

pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::health::health_check))
}

pub fn task_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/binary/full", post(handlers::tasks::submit_full_task))
        .route("/api/binary/short", post(handlers::tasks::submit_short_task))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
