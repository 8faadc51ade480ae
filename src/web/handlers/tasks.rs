//! # Task Submission Handlers
//!
//! Both endpoints block until the worker's result is correlated, then answer
//! `201 Created` with the result task.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::constants::UPLOAD_FIELD_NAME;
use crate::ingestion::RecordSource;
use crate::models::{ResultTask, TaskKind};
use crate::web::response_types::ApiError;
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ShortTaskRequest {
    pub text: String,
}

/// Submit a spreadsheet upload: POST /api/binary/full
pub async fn submit_full_task(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ResultTask>), ApiError> {
    let mut multipart = multipart?;
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD_NAME) {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await?;
            debug!(file_name = ?file_name, size = bytes.len(), "Received spreadsheet upload");
            upload = Some(bytes.to_vec());
            break;
        }
    }

    let bytes = upload.ok_or_else(|| {
        ApiError::bad_request(format!("missing multipart field '{}'", UPLOAD_FIELD_NAME))
    })?;

    let result = state
        .service
        .process_with(
            TaskKind::FullTask,
            RecordSource::Spreadsheet(bytes),
            state.process_options(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// Submit one inline text: POST /api/binary/short
pub async fn submit_short_task(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ShortTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ResultTask>), ApiError> {
    let Json(request) = request?;
    let result = state
        .service
        .process_with(
            TaskKind::ShortTask,
            RecordSource::Inline(request.text),
            state.process_options(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(result)))
}
