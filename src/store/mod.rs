//! # Result Store
//!
//! Read-only access to the key-value store where the external worker writes
//! each result envelope under the task's identifier.

mod errors;
mod provider;
pub mod providers;
mod traits;

pub use errors::{StoreError, StoreResult};
pub use provider::StoreProvider;
pub use providers::{InMemoryResultStore, RedisResultStore};
pub use traits::ResultStore;
