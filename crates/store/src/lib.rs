//! Key-value storage adapters for the trie engine.
//!
//! The engine persists RLP-encoded nodes under opaque byte paths and reads
//! them back when resolving hash references. This crate defines the
//! [`Database`] contract it talks to and ships two backends: an in-memory
//! map for tests and tools, and a RocksDB adapter behind the `rocksdb`
//! feature.

use thiserror::Error;

mod memory;
pub use memory::MemoryDb;

#[cfg(feature = "rocksdb")]
mod rocks;
#[cfg(feature = "rocksdb")]
pub use rocks::RocksDb;

/// Failure propagated from a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),
}

/// Contract between the trie engine and a key-value backend.
///
/// Keys are raw byte paths derived from the trie walk; the store treats them
/// as opaque. `get` signals an absent key with `None` rather than an error,
/// and implementations must hand back owned bytes so decoded nodes never
/// alias a backend buffer.
pub trait Database {
    /// Returns the bytes stored under `key`, or `None` if absent.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `value` under `key`, overwriting any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Removes `key`. Deleting an absent key is a no-op.
    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    /// Flushes pending writes and releases backend resources.
    fn close(&self) -> Result<(), StoreError>;
}
