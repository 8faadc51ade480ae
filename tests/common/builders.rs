use std::sync::Arc;

use rust_xlsxwriter::Workbook;
use task_bridge::config::CorrelationConfig;
use task_bridge::correlation::ResultCorrelator;
use task_bridge::messaging::MessagingProvider;
use task_bridge::models::{AnnotatedRecord, ResultTask, Task};
use task_bridge::services::{TaskPublisher, TaskService};
use task_bridge::store::StoreProvider;
use tokio::task::JoinHandle;

pub const TEST_QUEUE: &str = "task_queue";

/// Build an xlsx workbook whose first sheet holds `rows` as strings
pub fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
    workbook_bytes_at(0, rows)
}

/// Same as [`workbook_bytes`], but the first row is written at `first_row`
pub fn workbook_bytes_at(first_row: u32, rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet
                    .write_string(first_row + r as u32, c as u16, *value)
                    .unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Short, deterministic polling so tests finish fast
pub fn fast_correlation() -> CorrelationConfig {
    CorrelationConfig {
        default_timeout_seconds: 5,
        initial_poll_interval_ms: 2,
        max_poll_interval_ms: 20,
        backoff_multiplier: 2.0,
        jitter_factor: 0.0,
    }
}

pub async fn in_memory_service() -> TaskService {
    let publisher = TaskPublisher::new(Arc::new(MessagingProvider::new_in_memory()), TEST_QUEUE);
    publisher.ensure_queue().await.unwrap();
    let correlator = ResultCorrelator::new(
        Arc::new(StoreProvider::new_in_memory()),
        "",
        &fast_correlation(),
    );
    TaskService::new(publisher, correlator)
}

/// Result envelope annotating every record of `task` with `score(text)`
pub fn annotate(task: &Task, score: impl Fn(&str) -> i64) -> ResultTask {
    ResultTask {
        id: task.id(),
        kind: task.kind(),
        messages: task
            .records()
            .iter()
            .cloned()
            .map(|record| {
                let result = score(&record.message_text);
                AnnotatedRecord::from_record(record, result)
            })
            .collect(),
    }
}

/// Play the external worker: consume tasks from the in-memory queue and write
/// whatever `respond` returns into the in-memory store. `None` drops the task.
pub fn spawn_worker<F>(service: &TaskService, respond: F) -> JoinHandle<()>
where
    F: Fn(&Task) -> Option<String> + Send + 'static,
{
    let messaging = Arc::clone(service.publisher().messaging());
    let queue_name = service.publisher().queue_name().to_string();
    let correlator = service.correlator().clone();

    tokio::spawn(async move {
        let queue = messaging
            .as_in_memory()
            .expect("worker requires the in-memory queue");
        loop {
            queue.wait_for_message().await;

            let received = queue
                .receive_messages::<Task>(&queue_name, 16)
                .await
                .unwrap_or_default();

            for queued in received {
                if let Some(payload) = respond(&queued.message) {
                    correlator
                        .store()
                        .as_in_memory()
                        .expect("worker requires the in-memory store")
                        .put(correlator.key_for(queued.message.id()), payload);
                }
                let _ = queue
                    .ack_message(&queue_name, &queued.receipt_handle)
                    .await;
            }
        }
    })
}

/// Worker that scores each record by its text length
pub fn spawn_length_worker(service: &TaskService) -> JoinHandle<()> {
    spawn_worker(service, |task| {
        Some(serde_json::to_string(&annotate(task, |text| text.len() as i64)).unwrap())
    })
}
