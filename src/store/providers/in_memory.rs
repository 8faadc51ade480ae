//! In-memory result store
//!
//! Stands in for Redis in tests and local development. Tests play the worker
//! by calling [`InMemoryResultStore::put`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use dashmap::DashMap;

use crate::store::errors::{StoreError, StoreResult};
use crate::store::traits::ResultStore;

#[derive(Debug)]
pub struct InMemoryResultStore {
    entries: DashMap<String, String>,
    available: AtomicBool,
    get_count: AtomicU64,
}

impl Default for InMemoryResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            available: AtomicBool::new(true),
            get_count: AtomicU64::new(0),
        }
    }

    /// Write a value, as the external worker would
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Simulate a backend outage; every call fails while unavailable
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of `get` calls served, hits and misses alike
    pub fn get_count(&self) -> u64 {
        self.get_count.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::BackendError(
                "in-memory store marked unavailable".to_string(),
            ))
        }
    }
}

impl ResultStore for InMemoryResultStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.get_count.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(self.available.load(Ordering::SeqCst))
    }

    fn provider_name(&self) -> &'static str {
        "in_memory"
    }
}
