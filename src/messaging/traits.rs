//! # Messaging Service Traits
//!
//! Provider-agnostic queue operations. The bridge only publishes; consuming
//! is the worker's side of the queue.

use async_trait::async_trait;

use super::errors::MessagingError;

/// Core messaging service trait
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait MessagingService: Send + Sync + 'static {
    /// Declare a durable queue if it doesn't exist (idempotent)
    async fn ensure_queue(&self, queue_name: &str) -> Result<(), MessagingError>;

    /// Publish a message durably
    ///
    /// Returning `Ok` means the broker accepted the message, nothing more.
    async fn send_message<T: QueueMessage>(
        &self,
        queue_name: &str,
        message: &T,
    ) -> Result<(), MessagingError>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> Result<bool, MessagingError>;

    /// Provider name for logging
    fn provider_name(&self) -> &'static str;
}

/// Message serialization contract
///
/// JSON for every serde type via the blanket implementation.
pub trait QueueMessage: Send + Sync + Clone + 'static {
    fn to_bytes(&self) -> Result<Vec<u8>, MessagingError>;

    fn from_bytes(bytes: &[u8]) -> Result<Self, MessagingError>
    where
        Self: Sized;
}

impl<T> QueueMessage for T
where
    T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync + Clone + 'static,
{
    fn to_bytes(&self) -> Result<Vec<u8>, MessagingError> {
        serde_json::to_vec(self).map_err(|e| MessagingError::serialization(e.to_string()))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, MessagingError> {
        serde_json::from_slice(bytes).map_err(|e| MessagingError::deserialization(e.to_string()))
    }
}
