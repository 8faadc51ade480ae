mod common;

use std::collections::HashMap;
use std::time::Duration;

use common::*;
use task_bridge::correlation::CorrelationError;
use task_bridge::ingestion::RecordSource;
use task_bridge::models::{AnnotatedRecord, ResultTask, Task, TaskKind};
use task_bridge::{ProcessOptions, TaskError};
use tokio_util::sync::CancellationToken;

const HEADER: &[&str] = &["userID", "submitDate", "messageText"];

#[tokio::test]
async fn test_full_task_returns_stored_result_unchanged() {
    let service = in_memory_service().await;
    let stored = std::sync::Arc::new(parking_lot::Mutex::new(None::<ResultTask>));
    let worker = {
        let stored = std::sync::Arc::clone(&stored);
        spawn_worker(&service, move |task| {
            let result = annotate(task, |_| 1);
            *stored.lock() = Some(result.clone());
            Some(serde_json::to_string(&result).unwrap())
        })
    };

    let bytes = workbook_bytes(&[HEADER, &["u1", "d1", "one"], &["", "", ""]]);
    let result = service
        .process(TaskKind::FullTask, RecordSource::Spreadsheet(bytes))
        .await
        .unwrap();
    worker.abort();

    assert_eq!(Some(result.clone()), stored.lock().clone());
    assert_eq!(result.kind, TaskKind::FullTask);
    assert_eq!(
        result.messages,
        vec![AnnotatedRecord {
            user_id: "u1".into(),
            submit_date: "d1".into(),
            message_text: "one".into(),
            result: 1,
        }]
    );
}

#[tokio::test]
async fn test_result_preserves_record_order() {
    let service = in_memory_service().await;
    let worker = spawn_length_worker(&service);

    let bytes = workbook_bytes(&[
        HEADER,
        &["u1", "d1", "a"],
        &["u2", "d2", "bbb"],
        &["u3", "d3", "<b>cc</b>"],
    ]);
    let result = service
        .process(TaskKind::FullTask, RecordSource::Spreadsheet(bytes))
        .await
        .unwrap();
    worker.abort();

    let texts: Vec<_> = result.messages.iter().map(|m| m.message_text.as_str()).collect();
    let scores: Vec<_> = result.messages.iter().map(|m| m.result).collect();
    assert_eq!(texts, vec!["a", "bbb", "cc"]);
    assert_eq!(scores, vec![1, 3, 2]);
}

#[tokio::test]
async fn test_empty_sheet_still_round_trips() {
    let service = in_memory_service().await;
    let worker = spawn_length_worker(&service);

    let result = service
        .process(
            TaskKind::FullTask,
            RecordSource::Spreadsheet(workbook_bytes(&[HEADER])),
        )
        .await
        .unwrap();
    worker.abort();

    assert!(result.messages.is_empty());
    let queue = service.publisher().messaging().as_in_memory().unwrap();
    assert_eq!(queue.total_sent(TEST_QUEUE), 1);
}

#[tokio::test]
async fn test_publish_failure_never_reaches_store() {
    let service = in_memory_service().await;
    service
        .publisher()
        .messaging()
        .as_in_memory()
        .unwrap()
        .set_available(false);

    let err = service
        .process(TaskKind::ShortTask, RecordSource::Inline("hi".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, TaskError::Publish { .. }));
    assert!(!err.is_client_error());
    assert_eq!(
        service.correlator().store().as_in_memory().unwrap().get_count(),
        0
    );
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_task_times_out() {
    let service = in_memory_service().await;
    let worker = spawn_worker(&service, |_| None);

    let err = service
        .process_with(
            TaskKind::ShortTask,
            RecordSource::Inline("lost".into()),
            ProcessOptions::default().with_timeout(Duration::from_secs(3)),
        )
        .await
        .unwrap_err();
    worker.abort();

    assert!(err.is_timeout());
    assert!(err.task_id().is_some());
    // Misses were retried, not treated as errors
    assert!(service.correlator().store().as_in_memory().unwrap().get_count() > 1);
}

#[tokio::test(start_paused = true)]
async fn test_late_result_within_deadline_is_returned() {
    let service = in_memory_service().await;
    let store = std::sync::Arc::clone(service.correlator().store());
    let correlator = service.correlator().clone();
    let messaging = std::sync::Arc::clone(service.publisher().messaging());

    let worker = tokio::spawn(async move {
        let queue = messaging.as_in_memory().unwrap();
        queue.wait_for_message().await;
        let task = queue
            .receive_messages::<Task>(TEST_QUEUE, 1)
            .await
            .unwrap()
            .remove(0)
            .message;
        tokio::time::sleep(Duration::from_millis(2500)).await;
        store.as_in_memory().unwrap().put(
            correlator.key_for(task.id()),
            serde_json::to_string(&annotate(&task, |_| 7)).unwrap(),
        );
    });

    let result = service
        .process_with(
            TaskKind::ShortTask,
            RecordSource::Inline("slow".into()),
            ProcessOptions::default().with_timeout(Duration::from_secs(3)),
        )
        .await
        .unwrap();
    worker.await.unwrap();

    assert_eq!(result.messages[0].result, 7);
}

#[tokio::test]
async fn test_store_outage_is_terminal_correlation_error() {
    let service = in_memory_service().await;
    service
        .correlator()
        .store()
        .as_in_memory()
        .unwrap()
        .set_available(false);

    let err = service
        .process(TaskKind::ShortTask, RecordSource::Inline("hi".into()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TaskError::Correlation {
            source: CorrelationError::Store(_),
            ..
        }
    ));
    assert_eq!(
        service.correlator().store().as_in_memory().unwrap().get_count(),
        1
    );
}

#[tokio::test]
async fn test_malformed_result_is_correlation_error() {
    let service = in_memory_service().await;
    let worker = spawn_worker(&service, |_| Some("{\"id\": 12}".to_string()));

    let err = service
        .process(TaskKind::ShortTask, RecordSource::Inline("hi".into()))
        .await
        .unwrap_err();
    worker.abort();

    assert!(matches!(
        err,
        TaskError::Correlation {
            source: CorrelationError::MalformedPayload(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_length_mismatch_is_correlation_error() {
    let service = in_memory_service().await;
    let worker = spawn_worker(&service, |task| {
        let mut result = annotate(task, |_| 1);
        result.messages.clear();
        Some(serde_json::to_string(&result).unwrap())
    });

    let err = service
        .process(TaskKind::ShortTask, RecordSource::Inline("hi".into()))
        .await
        .unwrap_err();
    worker.abort();

    assert!(matches!(
        err,
        TaskError::Correlation {
            source: CorrelationError::Mismatch(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_cancellation_releases_wait() {
    let service = in_memory_service().await;
    let token = CancellationToken::new();

    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        })
    };

    let started = std::time::Instant::now();
    let err = service
        .process_with(
            TaskKind::ShortTask,
            RecordSource::Inline("never answered".into()),
            ProcessOptions::default()
                .with_timeout(Duration::from_secs(30))
                .with_cancellation(token),
        )
        .await
        .unwrap_err();
    canceller.await.unwrap();

    assert!(matches!(err, TaskError::Cancelled { .. }));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_concurrent_requests_get_their_own_results() {
    let service = in_memory_service().await;
    let worker = spawn_length_worker(&service);

    let requests = (0..25).map(|i| {
        let service = service.clone();
        tokio::spawn(async move {
            let text = "x".repeat(i + 1);
            let result = service
                .process(TaskKind::ShortTask, RecordSource::Inline(text.clone()))
                .await
                .unwrap();
            (text, result)
        })
    });

    let mut seen = HashMap::new();
    for request in requests.collect::<Vec<_>>() {
        let (text, result) = request.await.unwrap();
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].message_text, text);
        assert_eq!(result.messages[0].result, text.len() as i64);
        assert!(seen.insert(result.id, text).is_none());
    }
    worker.abort();

    assert_eq!(seen.len(), 25);
}
