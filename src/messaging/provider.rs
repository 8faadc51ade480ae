//! # Messaging Provider
//!
//! Enum dispatch over the concrete messaging services. `MessagingService` has
//! generic methods, so it is not object safe; the enum stands in for
//! `Arc<dyn MessagingService>`.

use tracing::debug;

use super::errors::MessagingError;
use super::providers::{InMemoryMessagingService, RabbitMqMessagingService};
use super::traits::{MessagingService, QueueMessage};

#[derive(Debug)]
pub enum MessagingProvider {
    /// RabbitMQ provider (boxed to reduce enum size)
    RabbitMq(Box<RabbitMqMessagingService>),
    InMemory(InMemoryMessagingService),
}

impl MessagingProvider {
    pub fn new_rabbitmq(service: RabbitMqMessagingService) -> Self {
        Self::RabbitMq(Box::new(service))
    }

    pub fn new_in_memory() -> Self {
        Self::InMemory(InMemoryMessagingService::new())
    }

    /// The in-memory service, if that is the active provider
    pub fn as_in_memory(&self) -> Option<&InMemoryMessagingService> {
        match self {
            Self::InMemory(s) => Some(s),
            Self::RabbitMq(_) => None,
        }
    }

    pub async fn ensure_queue(&self, queue_name: &str) -> Result<(), MessagingError> {
        match self {
            Self::RabbitMq(s) => s.ensure_queue(queue_name).await,
            Self::InMemory(s) => s.ensure_queue(queue_name).await,
        }
    }

    pub async fn send_message<T: QueueMessage>(
        &self,
        queue_name: &str,
        message: &T,
    ) -> Result<(), MessagingError> {
        match self {
            Self::RabbitMq(s) => s.send_message(queue_name, message).await,
            Self::InMemory(s) => s.send_message(queue_name, message).await,
        }
    }

    pub async fn health_check(&self) -> Result<bool, MessagingError> {
        match self {
            Self::RabbitMq(s) => s.health_check().await,
            Self::InMemory(s) => s.health_check().await,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::RabbitMq(s) => s.provider_name(),
            Self::InMemory(s) => s.provider_name(),
        }
    }

    /// Release broker resources; a no-op for in-memory queues
    pub async fn close(&self) -> Result<(), MessagingError> {
        debug!(provider = self.provider_name(), "Closing messaging provider");
        match self {
            Self::RabbitMq(s) => s.close().await,
            Self::InMemory(_) => Ok(()),
        }
    }
}
