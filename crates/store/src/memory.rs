//! In-memory store used by tests and short-lived tries.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{Database, StoreError};

type Shared = Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>;

/// A [`Database`] over a shared in-memory map.
///
/// Clones share the underlying map, so a trie committed through one handle
/// can be reloaded through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    inner: Shared,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.read(|map| map.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` currently holds a value.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.read(|map| map.contains_key(key))
    }

    fn read<T>(&self, f: impl FnOnce(&HashMap<Vec<u8>, Vec<u8>>) -> T) -> T {
        match self.inner.read() {
            Ok(map) => f(&map),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }
}

impl Database for MemoryDb {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.read(|map| map.get(key).cloned()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".into()))?;
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".into()))?;
        map.remove(key);
        Ok(())
    }

    fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
