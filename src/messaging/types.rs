//! # Messaging Types
//!
//! Provider-agnostic handles for received messages.

use std::fmt;

/// Handle for acknowledging a received message (a sequence number as string)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiptHandle(pub String);

impl ReceiptHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ReceiptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ReceiptHandle {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A message received from a queue
#[derive(Debug, Clone)]
pub struct QueuedMessage<T> {
    pub receipt_handle: ReceiptHandle,
    pub message: T,
    /// 1 on first delivery, higher when the broker redelivered it
    pub receive_count: u32,
}

impl<T> QueuedMessage<T> {
    pub fn new(receipt_handle: ReceiptHandle, message: T, receive_count: u32) -> Self {
        Self {
            receipt_handle,
            message,
            receive_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_handle_parses_delivery_tag() {
        let handle = ReceiptHandle::from(42u64);
        assert_eq!(handle.as_str(), "42");
        assert_eq!(handle.as_u64(), Some(42));
        assert_eq!(ReceiptHandle("abc".to_string()).as_u64(), None);
    }
}
