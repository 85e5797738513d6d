//! Cart storage port and its implementations.
//!
//! The store persists one text record per cart. Where that text lives depends
//! on the runtime context:
//!
//! - [`FileStorage`] - one file per key, used by the storefront server
//! - [`MemoryStorage`] - in-process map, used by tests and throwaway runs
//! - [`DetachedStorage`] - no persistence at all (non-interactive contexts such
//!   as pre-rendering); reads find nothing and writes are dropped

use std::collections::HashMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors from a storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key-value text storage for cart records.
///
/// Implementations must be thread-safe; the storefront shares one storage
/// across all request handlers. There is no locking across a
/// read-modify-write cycle: concurrent writers to the same key race and the
/// last write wins.
pub trait CartStorage: Send + Sync {
    /// Whether this medium persists anything in the current context.
    fn is_available(&self) -> bool {
        true
    }

    /// Read the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium failed; an absent key is `Ok(None)`.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium failed.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: CartStorage + ?Sized> CartStorage for Arc<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// One JSON file per key under a directory.
///
/// Keys are percent-encoded into file names, so arbitrary cart IDs cannot
/// escape the directory or collide with each other. Each write goes to its
/// own temporary file in the same directory which then replaces the record,
/// so concurrent writers never share a temporary path and readers only ever
/// see a complete record.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

// =============================================================================
// DetachedStorage
// =============================================================================

/// Storage for contexts without a persistence medium.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedStorage;

impl CartStorage for DetachedStorage {
    fn is_available(&self) -> bool {
        false
    }

    fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }
}
