//! # Task Service
//!
//! The single entry point request handlers call. One `process` call runs the
//! whole pipeline for one request:
//!
//! ```text
//! RecordSource -> ingest -> submit -> publish -> await result -> verify
//! ```
//!
//! The first failing stage ends the call with its error; a publish failure
//! means the result store is never consulted.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{field, info, instrument, Span};

use super::publisher::{submit, TaskPublisher};
use crate::correlation::{CorrelationError, ResultCorrelator};
use crate::error::{TaskError, TaskResult};
use crate::ingestion::{ingest, RecordSource};
use crate::logging::log_error;
use crate::models::{ResultTask, Task, TaskKind};

/// Per-call overrides for [`TaskService::process_with`]
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Upper bound on the result wait; the correlator default when `None`
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl ProcessOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Reachability of the two backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct HealthReport {
    pub queue: bool,
    pub store: bool,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.queue && self.store
    }
}

#[derive(Debug, Clone)]
pub struct TaskService {
    publisher: TaskPublisher,
    correlator: ResultCorrelator,
}

impl TaskService {
    pub fn new(publisher: TaskPublisher, correlator: ResultCorrelator) -> Self {
        Self {
            publisher,
            correlator,
        }
    }

    pub fn publisher(&self) -> &TaskPublisher {
        &self.publisher
    }

    pub fn correlator(&self) -> &ResultCorrelator {
        &self.correlator
    }

    pub async fn process(&self, kind: TaskKind, source: RecordSource) -> TaskResult<ResultTask> {
        self.process_with(kind, source, ProcessOptions::default())
            .await
    }

    #[instrument(
        skip_all,
        fields(kind = %kind, source = source.label(), task_id = field::Empty)
    )]
    pub async fn process_with(
        &self,
        kind: TaskKind,
        source: RecordSource,
        options: ProcessOptions,
    ) -> TaskResult<ResultTask> {
        let records = ingest(source).await?;

        let task = submit(kind, records);
        Span::current().record("task_id", field::display(task.id()));

        self.publisher.publish(&task).await?;

        let result = self.await_verified(&task, &options).await.inspect_err(|err| {
            if matches!(err, TaskError::Correlation { .. }) {
                log_error(
                    "task_service",
                    "correlate",
                    &err.to_string(),
                    Some(&format!("task_id={}", task.id())),
                );
            }
        })?;

        info!(record_count = result.messages.len(), "Task result correlated");
        Ok(result)
    }

    async fn await_verified(&self, task: &Task, options: &ProcessOptions) -> TaskResult<ResultTask> {
        let result = match &options.cancel {
            Some(cancel) => {
                self.correlator
                    .await_result_cancellable(task.id(), options.timeout, cancel)
                    .await?
            }
            None => self.correlator.await_result(task.id(), options.timeout).await?,
        };

        result
            .verify_against(task)
            .map_err(|mismatch| TaskError::Correlation {
                task_id: task.id(),
                source: CorrelationError::Mismatch(mismatch),
            })?;
        Ok(result)
    }

    pub async fn health(&self) -> HealthReport {
        let queue = self
            .publisher
            .messaging()
            .health_check()
            .await
            .unwrap_or(false);
        let store = self
            .correlator
            .store()
            .health_check()
            .await
            .unwrap_or(false);
        HealthReport { queue, store }
    }
}
