//! # Result Correlation
//!
//! Bounded, cancellable waiting for the result the worker writes back under a
//! task's identifier.

mod backoff;
mod correlator;
mod errors;

pub use backoff::BackoffPolicy;
pub use correlator::ResultCorrelator;
pub use errors::CorrelationError;
