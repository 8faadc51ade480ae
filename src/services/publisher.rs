//! # Task Publisher
//!
//! Builds task envelopes and hands them to the outbound queue. Success means
//! the broker accepted the message; no worker acknowledgment is awaited and
//! failures are not retried here.

use std::sync::Arc;

use tracing::debug;

use crate::error::{TaskError, TaskResult};
use crate::logging::{log_error, log_task_operation};
use crate::messaging::{MessagingError, MessagingProvider};
use crate::models::{Record, Task, TaskKind};

/// Assemble a task with a freshly minted identifier
pub fn submit(kind: TaskKind, records: Vec<Record>) -> Task {
    Task::new(kind, records)
}

#[derive(Debug, Clone)]
pub struct TaskPublisher {
    messaging: Arc<MessagingProvider>,
    queue_name: String,
}

impl TaskPublisher {
    pub fn new(messaging: Arc<MessagingProvider>, queue_name: impl Into<String>) -> Self {
        Self {
            messaging,
            queue_name: queue_name.into(),
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    pub fn messaging(&self) -> &Arc<MessagingProvider> {
        &self.messaging
    }

    /// Declare the task queue; safe to call repeatedly
    pub async fn ensure_queue(&self) -> Result<(), MessagingError> {
        self.messaging.ensure_queue(&self.queue_name).await
    }

    pub async fn publish(&self, task: &Task) -> TaskResult<()> {
        debug!(
            task_id = %task.id(),
            kind = %task.kind(),
            record_count = task.len(),
            queue = %self.queue_name,
            "Publishing task"
        );

        self.messaging
            .send_message(&self.queue_name, task)
            .await
            .map_err(|source| {
                log_error(
                    "task_publisher",
                    "publish",
                    &source.to_string(),
                    Some(&format!("task_id={} queue={}", task.id(), self.queue_name)),
                );
                TaskError::Publish {
                    task_id: task.id(),
                    source,
                }
            })?;

        log_task_operation(
            "publish",
            Some(task.id()),
            Some(task.kind().as_str()),
            Some(task.len()),
            "accepted",
            Some(&self.queue_name),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publisher() -> TaskPublisher {
        TaskPublisher::new(Arc::new(MessagingProvider::new_in_memory()), "task_queue")
    }

    #[tokio::test]
    async fn test_publish_puts_task_json_on_queue() {
        let publisher = publisher();
        publisher.ensure_queue().await.unwrap();

        let task = submit(
            TaskKind::FullTask,
            vec![Record::new("u1", "d1", "hi"), Record::new("u2", "d2", "ok")],
        );
        publisher.publish(&task).await.unwrap();

        let received = publisher
            .messaging()
            .as_in_memory()
            .unwrap()
            .receive_messages::<serde_json::Value>("task_queue", 10)
            .await
            .unwrap();
        assert_eq!(received.len(), 1);

        let body = &received[0].message;
        assert_eq!(body["id"], task.id().to_string());
        assert_eq!(body["type"], "FullTask");
        assert_eq!(body["messages"][1]["messageText"], "ok");
    }

    #[tokio::test]
    async fn test_publish_to_undeclared_queue_is_publish_error() {
        let publisher = publisher();
        let task = submit(TaskKind::ShortTask, vec![Record::new("1", "1", "x")]);

        let err = publisher.publish(&task).await.unwrap_err();
        assert!(matches!(err, TaskError::Publish { task_id, .. } if task_id == task.id()));
    }

    #[tokio::test]
    async fn test_publish_while_broker_down() {
        let publisher = publisher();
        publisher.ensure_queue().await.unwrap();
        publisher.messaging().as_in_memory().unwrap().set_available(false);

        let task = submit(TaskKind::ShortTask, Vec::new());
        assert!(matches!(
            publisher.publish(&task).await,
            Err(TaskError::Publish { .. })
        ));
        assert_eq!(
            publisher
                .messaging()
                .as_in_memory()
                .unwrap()
                .queue_length("task_queue"),
            0
        );
    }

    #[test]
    fn test_submit_mints_distinct_ids() {
        let a = submit(TaskKind::ShortTask, Vec::new());
        let b = submit(TaskKind::ShortTask, Vec::new());
        assert_ne!(a.id(), b.id());
        assert!(a.is_empty());
    }
}
