use thiserror::Error;

use crate::models::CorrelationMismatch;
use crate::store::StoreError;

/// Terminal failures while retrieving a result
///
/// A store miss is not represented here; it is retried until the deadline.
#[derive(Debug, Error)]
pub enum CorrelationError {
    #[error("result store failure: {0}")]
    Store(#[from] StoreError),

    #[error("result payload is not a valid result task: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("result does not correlate with its task: {0}")]
    Mismatch(#[from] CorrelationMismatch),
}
