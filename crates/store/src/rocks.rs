//! RocksDB-backed store for persistent tries.

use std::path::Path;

use log::debug;
use rocksdb::{Options, DB};

use crate::{Database, StoreError};

impl From<rocksdb::Error> for StoreError {
    fn from(err: rocksdb::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// A [`Database`] over a RocksDB instance.
pub struct RocksDb {
    db: DB,
}

impl RocksDb {
    /// Opens (or creates) a database at `path` with default options.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let mut options = Options::default();
        options.create_if_missing(true);
        Self::with_options(path, options)
    }

    /// Opens a database at `path` with caller-supplied options.
    pub fn with_options(path: &Path, options: Options) -> Result<Self, StoreError> {
        let db = DB::open(&options, path)?;
        debug!("opened rocksdb store at {}", path.display());
        Ok(Self { db })
    }
}

impl Database for RocksDb {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        Ok(self.db.put(key, value)?)
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        Ok(self.db.delete(key)?)
    }

    fn close(&self) -> Result<(), StoreError> {
        Ok(self.db.flush()?)
    }
}
