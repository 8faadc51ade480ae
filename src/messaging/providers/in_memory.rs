//! # In-Memory Messaging Service
//!
//! Thread-safe in-process queues for tests and local development.
//!
//! Besides the `MessagingService` API it plays the worker's side of the queue
//! (receive and ack) and can simulate a broker outage
//! ([`InMemoryMessagingService::set_available`]) so publish failure paths can
//! be exercised without a real broker.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::messaging::errors::MessagingError;
use crate::messaging::traits::{MessagingService, QueueMessage};
use crate::messaging::types::{QueuedMessage, ReceiptHandle};

#[derive(Debug, Clone)]
struct StoredMessage {
    payload: Vec<u8>,
    receive_count: u32,
}

#[derive(Debug, Default)]
struct InMemoryQueue {
    ready: VecDeque<StoredMessage>,
    in_flight: HashMap<u64, StoredMessage>,
    total_sent: u64,
    total_acked: u64,
}

/// In-memory messaging service
#[derive(Debug)]
pub struct InMemoryMessagingService {
    queues: Mutex<HashMap<String, InMemoryQueue>>,
    next_receipt: AtomicU64,
    available: AtomicBool,
    arrivals: Notify,
}

impl Default for InMemoryMessagingService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessagingService {
    pub fn new() -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
            next_receipt: AtomicU64::new(1),
            available: AtomicBool::new(true),
            arrivals: Notify::new(),
        }
    }

    /// Create with pre-declared queues
    pub fn with_queues(queue_names: &[&str]) -> Self {
        let service = Self::new();
        {
            let mut queues = service.queues.lock();
            for name in queue_names {
                queues.insert((*name).to_string(), InMemoryQueue::default());
            }
        }
        service
    }

    /// Simulate the broker going down (`false`) or coming back (`true`)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Messages waiting to be received
    pub fn queue_length(&self, queue_name: &str) -> usize {
        self.queues
            .lock()
            .get(queue_name)
            .map(|q| q.ready.len())
            .unwrap_or(0)
    }

    /// Messages ever accepted by the queue
    pub fn total_sent(&self, queue_name: &str) -> u64 {
        self.queues
            .lock()
            .get(queue_name)
            .map(|q| q.total_sent)
            .unwrap_or(0)
    }

    /// Messages acknowledged by a consumer
    pub fn total_acked(&self, queue_name: &str) -> u64 {
        self.queues
            .lock()
            .get(queue_name)
            .map(|q| q.total_acked)
            .unwrap_or(0)
    }

    /// Wait until a message has been sent since the previous wait returned
    pub async fn wait_for_message(&self) {
        self.arrivals.notified().await;
    }

    /// Take up to `max_messages` messages off the queue, as a worker would
    pub async fn receive_messages<T: QueueMessage>(
        &self,
        queue_name: &str,
        max_messages: usize,
    ) -> Result<Vec<QueuedMessage<T>>, MessagingError> {
        self.check_available(queue_name, "receive")?;

        let mut taken = Vec::new();
        {
            let mut queues = self.queues.lock();
            let queue = queues
                .get_mut(queue_name)
                .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

            while taken.len() < max_messages {
                let Some(mut stored) = queue.ready.pop_front() else {
                    break;
                };
                stored.receive_count += 1;
                let receipt = self.next_receipt.fetch_add(1, Ordering::SeqCst);
                queue.in_flight.insert(receipt, stored.clone());
                taken.push((receipt, stored));
            }
        }

        taken
            .into_iter()
            .map(|(receipt, stored)| {
                Ok(QueuedMessage::new(
                    ReceiptHandle::from(receipt),
                    T::from_bytes(&stored.payload)?,
                    stored.receive_count,
                ))
            })
            .collect()
    }

    /// Acknowledge a message taken by [`Self::receive_messages`]
    pub async fn ack_message(
        &self,
        queue_name: &str,
        receipt_handle: &ReceiptHandle,
    ) -> Result<(), MessagingError> {
        self.check_available(queue_name, "ack")?;
        let receipt = receipt_handle
            .as_u64()
            .ok_or_else(|| MessagingError::invalid_receipt_handle(receipt_handle.as_str()))?;

        let mut queues = self.queues.lock();
        let queue = queues
            .get_mut(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        match queue.in_flight.remove(&receipt) {
            Some(_) => {
                queue.total_acked += 1;
                Ok(())
            }
            None => Err(MessagingError::invalid_receipt_handle(receipt_handle.as_str())),
        }
    }

    fn check_available(&self, queue_name: &str, operation: &str) -> Result<(), MessagingError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(MessagingError::queue_operation(
                queue_name,
                operation,
                "broker unavailable",
            ))
        }
    }
}

#[async_trait]
impl MessagingService for InMemoryMessagingService {
    async fn ensure_queue(&self, queue_name: &str) -> Result<(), MessagingError> {
        self.check_available(queue_name, "create")?;
        self.queues
            .lock()
            .entry(queue_name.to_string())
            .or_default();
        Ok(())
    }

    async fn send_message<T: QueueMessage>(
        &self,
        queue_name: &str,
        message: &T,
    ) -> Result<(), MessagingError> {
        self.check_available(queue_name, "send")?;
        let payload = message.to_bytes()?;

        {
            let mut queues = self.queues.lock();
            let queue = queues
                .get_mut(queue_name)
                .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;
            queue.ready.push_back(StoredMessage {
                payload,
                receive_count: 0,
            });
            queue.total_sent += 1;
        }

        self.arrivals.notify_one();
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, MessagingError> {
        Ok(self.available.load(Ordering::SeqCst))
    }

    fn provider_name(&self) -> &'static str {
        "in_memory"
    }
}
