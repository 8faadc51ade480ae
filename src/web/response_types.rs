//! # Web API Error Types
//!
//! HTTP mapping for task failures. Every error body has the shape
//! `{"error": {"code": ..., "message": ...}}`.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::error::TaskError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request itself was unusable
    #[error("Invalid request: {message}")]
    BadRequest { code: &'static str, message: String },

    /// The worker did not answer in time
    #[error("Timed out waiting for result: {message}")]
    GatewayTimeout { message: String },

    /// The server is shutting down or a backend is unreachable
    #[error("Service temporarily unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// Publishing or correlation failed
    #[error("Task processing failed: {message}")]
    Internal { code: &'static str, message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: "BAD_REQUEST",
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::GatewayTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn parts(&self) -> (&'static str, &str) {
        match self {
            Self::BadRequest { code, message } => (*code, message.as_str()),
            Self::GatewayTimeout { message } => ("RESULT_TIMEOUT", message.as_str()),
            Self::ServiceUnavailable { message } => ("SERVICE_UNAVAILABLE", message.as_str()),
            Self::Internal { code, message } => (*code, message.as_str()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let (error_code, message) = self.parts();

        let error_response = json!({
            "error": {
                "code": error_code,
                "message": message
            }
        });

        (status_code, Json(error_response)).into_response()
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        let code = err.error_code();
        let message = err.to_string();

        if err.is_client_error() {
            return Self::BadRequest { code, message };
        }

        warn!(code = code, task_id = ?err.task_id(), error = %message, "Task request failed");
        match err {
            TaskError::Timeout { .. } => Self::GatewayTimeout { message },
            TaskError::Cancelled { .. } => Self::ServiceUnavailable { message },
            _ => Self::Internal { code, message },
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Self::BadRequest {
            code: "INVALID_MULTIPART",
            message: err.body_text(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            code: "INVALID_JSON",
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::BadRequest {
            code: "INVALID_MULTIPART",
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uuid::Uuid;

    use crate::ingestion::IngestionError;
    use crate::messaging::MessagingError;

    #[test]
    fn test_task_error_status_mapping() {
        let id = Uuid::new_v4();

        let malformed: ApiError = TaskError::from(IngestionError::malformed("not a sheet")).into();
        assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);

        let publish: ApiError = TaskError::Publish {
            task_id: id,
            source: MessagingError::rejected("task_queue"),
        }
        .into();
        assert_eq!(publish.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let timeout: ApiError = TaskError::Timeout {
            task_id: id,
            waited: Duration::from_secs(60),
        }
        .into();
        assert_eq!(timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);

        let cancelled: ApiError = TaskError::Cancelled { task_id: id }.into();
        assert_eq!(cancelled.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_codes_carry_through() {
        let err: ApiError = TaskError::from(IngestionError::malformed("x")).into();
        assert_eq!(err.parts().0, "MALFORMED_INPUT");

        let err = ApiError::bad_request("missing field");
        assert_eq!(err.parts(), ("BAD_REQUEST", "missing field"));
    }
}
