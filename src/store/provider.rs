//! # Store Provider
//!
//! Enum dispatch over result store backends. `ResultStore` uses return-position
//! `impl Future`, so it cannot be a trait object.

use super::errors::StoreResult;
use super::providers::{InMemoryResultStore, RedisResultStore};
use super::traits::ResultStore;

#[derive(Debug)]
pub enum StoreProvider {
    Redis(Box<RedisResultStore>),
    InMemory(InMemoryResultStore),
}

impl StoreProvider {
    pub fn new_redis(store: RedisResultStore) -> Self {
        Self::Redis(Box::new(store))
    }

    pub fn new_in_memory() -> Self {
        Self::InMemory(InMemoryResultStore::new())
    }

    pub fn as_in_memory(&self) -> Option<&InMemoryResultStore> {
        match self {
            Self::InMemory(s) => Some(s),
            Self::Redis(_) => None,
        }
    }

    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self {
            Self::Redis(s) => s.get(key).await,
            Self::InMemory(s) => s.get(key).await,
        }
    }

    pub async fn health_check(&self) -> StoreResult<bool> {
        match self {
            Self::Redis(s) => s.health_check().await,
            Self::InMemory(s) => s.health_check().await,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Redis(s) => s.provider_name(),
            Self::InMemory(s) => s.provider_name(),
        }
    }
}
