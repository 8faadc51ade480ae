//! # Task Error
//!
//! Every stage of `process` reports through [`TaskError`]; the variant tells
//! the caller which stage failed and whether the request itself was at fault.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigurationError;
use crate::correlation::CorrelationError;
use crate::ingestion::IngestionError;
use crate::messaging::MessagingError;

#[derive(Debug, Error)]
pub enum TaskError {
    /// The submitted input could not be turned into records
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    /// The queue did not accept the task
    #[error("Failed to publish task {task_id}: {source}")]
    Publish {
        task_id: Uuid,
        #[source]
        source: MessagingError,
    },

    /// The result could not be fetched, decoded, or matched to its task
    #[error("Failed to correlate result for task {task_id}: {source}")]
    Correlation {
        task_id: Uuid,
        #[source]
        source: CorrelationError,
    },

    #[error("Timed out after {waited:?} waiting for the result of task {task_id}")]
    Timeout { task_id: Uuid, waited: Duration },

    #[error("Wait for the result of task {task_id} was cancelled")]
    Cancelled { task_id: Uuid },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A backend could not be reached while assembling the system
    #[error("Failed to start {component}: {message}")]
    Startup {
        component: &'static str,
        message: String,
    },
}

pub type TaskResult<T> = Result<T, TaskError>;

impl TaskError {
    pub fn startup(component: &'static str, error: impl std::fmt::Display) -> Self {
        Self::Startup {
            component,
            message: error.to_string(),
        }
    }

    /// True when the caller's input caused the failure
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Ingestion(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// The task the failure belongs to, once one was built
    pub fn task_id(&self) -> Option<Uuid> {
        match self {
            Self::Publish { task_id, .. }
            | Self::Correlation { task_id, .. }
            | Self::Timeout { task_id, .. }
            | Self::Cancelled { task_id } => Some(*task_id),
            Self::Ingestion(_) | Self::Configuration(_) | Self::Startup { .. } => None,
        }
    }

    /// Stable machine-readable code for API responses and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ingestion(IngestionError::Io { .. }) => "INGESTION_IO",
            Self::Ingestion(IngestionError::MalformedInput { .. }) => "MALFORMED_INPUT",
            Self::Publish { .. } => "PUBLISH_FAILED",
            Self::Correlation { .. } => "CORRELATION_FAILED",
            Self::Timeout { .. } => "RESULT_TIMEOUT",
            Self::Cancelled { .. } => "CANCELLED",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Startup { .. } => "STARTUP_FAILED",
        }
    }
}
