//! Result store trait definition

use super::errors::StoreResult;

/// Read side of the key-value store the worker writes results into
///
/// The bridge never writes; results are produced by the external worker.
pub trait ResultStore: Send + Sync {
    /// Fetch a value by key
    ///
    /// Returns `Ok(Some(value))` on hit, `Ok(None)` when the key is not there
    /// yet, and `Err` only for transport or backend failures.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = StoreResult<Option<String>>> + Send;

    /// Check if the store backend is reachable
    fn health_check(&self) -> impl std::future::Future<Output = StoreResult<bool>> + Send;

    /// Name of the store provider
    fn provider_name(&self) -> &'static str;
}
