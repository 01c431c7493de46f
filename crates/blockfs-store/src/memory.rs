//! In-memory block store for tests and ephemeral mounts.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::traits::{BlockStore, Namespace};

/// In-memory store, no persistence.
///
/// Stores all records in memory behind a lock. This is the backend used
/// throughout the test suites; a fresh instance is an unformatted
/// filesystem.
#[derive(Debug, Default)]
pub struct MemoryBlockStore {
    /// Records per namespace.
    records: RwLock<HashMap<Namespace, HashMap<String, Vec<u8>>>>,
}

impl MemoryBlockStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held in a namespace.
    ///
    /// Useful in tests for checking that freed blocks were actually
    /// deleted rather than leaked.
    pub fn record_count(&self, ns: Namespace) -> usize {
        let records: std::sync::RwLockReadGuard<'_, HashMap<Namespace, HashMap<String, Vec<u8>>>> =
            self.records.read().unwrap();
        records.get(&ns).map(|m| m.len()).unwrap_or(0)
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn get(&self, ns: Namespace, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let records: std::sync::RwLockReadGuard<'_, HashMap<Namespace, HashMap<String, Vec<u8>>>> =
            self.records.read().unwrap();
        Ok(records.get(&ns).and_then(|m| m.get(key)).cloned())
    }

    async fn put(&self, ns: Namespace, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut records: std::sync::RwLockWriteGuard<
            '_,
            HashMap<Namespace, HashMap<String, Vec<u8>>>,
        > = self.records.write().unwrap();
        records
            .entry(ns)
            .or_default()
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn delete(&self, ns: Namespace, key: &str) -> Result<(), StoreError> {
        let mut records: std::sync::RwLockWriteGuard<
            '_,
            HashMap<Namespace, HashMap<String, Vec<u8>>>,
        > = self.records.write().unwrap();
        if let Some(m) = records.get_mut(&ns) {
            m.remove(key);
        }
        Ok(())
    }

    async fn clear(&self, ns: Namespace) -> Result<(), StoreError> {
        let mut records: std::sync::RwLockWriteGuard<
            '_,
            HashMap<Namespace, HashMap<String, Vec<u8>>>,
        > = self.records.write().unwrap();
        records.remove(&ns);
        Ok(())
    }
}
