//! Result store error types

use thiserror::Error;

/// Errors talking to the result store
///
/// A missing key is not an error; `get` returns `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the store backend
    #[error("Result store connection error: {0}")]
    ConnectionError(String),

    /// The backend rejected or failed a command
    #[error("Result store backend error: {0}")]
    BackendError(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
