//! # Result Correlator
//!
//! Waits for the worker's result for one task by polling the result store
//! under the task's key. A miss means "not ready yet" and is retried on an
//! exponential backoff schedule; anything else ends the wait.
//!
//! The wait is bounded by a deadline and suspends on the tokio timer between
//! polls, so thousands of concurrent waiters cost no threads.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::backoff::BackoffPolicy;
use super::errors::CorrelationError;
use crate::config::CorrelationConfig;
use crate::error::{TaskError, TaskResult};
use crate::models::{CorrelationMismatch, ResultTask};
use crate::store::StoreProvider;

// Stand-in deadline when `now + timeout` does not fit in an `Instant`
const UNBOUNDED_WAIT: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Clone)]
pub struct ResultCorrelator {
    store: Arc<StoreProvider>,
    key_prefix: String,
    backoff: BackoffPolicy,
    default_timeout: Duration,
}

impl ResultCorrelator {
    pub fn new(
        store: Arc<StoreProvider>,
        key_prefix: impl Into<String>,
        config: &CorrelationConfig,
    ) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
            backoff: BackoffPolicy::from_config(config),
            default_timeout: config.default_timeout(),
        }
    }

    /// Replace the polling schedule
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Store key the worker writes the result for `task_id` under
    pub fn key_for(&self, task_id: Uuid) -> String {
        format!("{}{}", self.key_prefix, task_id.hyphenated())
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn store(&self) -> &Arc<StoreProvider> {
        &self.store
    }

    /// Wait for the result of `task_id`, at most `timeout` (or the default)
    pub async fn await_result(
        &self,
        task_id: Uuid,
        timeout: Option<Duration>,
    ) -> TaskResult<ResultTask> {
        let timeout = timeout.unwrap_or(self.default_timeout);
        self.poll_until_deadline(task_id, timeout).await
    }

    /// As [`await_result`](Self::await_result), returning
    /// [`TaskError::Cancelled`] as soon as `cancel` fires
    pub async fn await_result_cancellable(
        &self,
        task_id: Uuid,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> TaskResult<ResultTask> {
        let timeout = timeout.unwrap_or(self.default_timeout);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(task_id = %task_id, "Result wait cancelled");
                Err(TaskError::Cancelled { task_id })
            }
            result = self.poll_until_deadline(task_id, timeout) => result,
        }
    }

    #[instrument(skip(self))]
    async fn poll_until_deadline(&self, task_id: Uuid, timeout: Duration) -> TaskResult<ResultTask> {
        let key = self.key_for(task_id);
        let started = Instant::now();
        let deadline = started
            .checked_add(timeout)
            .unwrap_or_else(|| started + UNBOUNDED_WAIT);
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);

            let fetched = tokio::time::timeout_at(deadline, self.store.get(&key)).await;
            match fetched {
                Ok(Ok(Some(payload))) => {
                    debug!(attempts = attempt, elapsed_ms = started.elapsed().as_millis() as u64, "Result found");
                    return decode_result(task_id, &payload);
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    warn!(attempts = attempt, error = %e, "Result store failure while awaiting result");
                    return Err(TaskError::Correlation {
                        task_id,
                        source: CorrelationError::Store(e),
                    });
                }
                // The GET itself outlived the deadline
                Err(_) => break,
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            tokio::time::sleep(self.backoff.delay_within(attempt, deadline - now)).await;
        }

        debug!(attempts = attempt, "Result did not arrive before deadline");
        Err(TaskError::Timeout {
            task_id,
            waited: timeout,
        })
    }
}

fn decode_result(task_id: Uuid, payload: &str) -> TaskResult<ResultTask> {
    let result: ResultTask =
        serde_json::from_str(payload).map_err(|e| TaskError::Correlation {
            task_id,
            source: CorrelationError::MalformedPayload(e),
        })?;

    if result.id != task_id {
        return Err(TaskError::Correlation {
            task_id,
            source: CorrelationError::Mismatch(CorrelationMismatch::Id {
                expected: task_id,
                found: result.id,
            }),
        });
    }

    Ok(result)
}
