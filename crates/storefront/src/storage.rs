//! Local key-value persistence.
//!
//! The browser profile's local storage becomes a [`KeyValueStore`] trait:
//! string keys, string values, synchronous and best-effort. Consumers treat
//! a missing key as "nothing saved yet", never as an error.
//!
//! Two implementations are provided: [`MemoryStore`] for tests and demos,
//! and [`FileStore`] which keeps one file per key under a profile-scoped
//! directory.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Errors from the local key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failure (disk full, permissions, ...).
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store cannot be used at all (e.g., poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Well-known storage keys.
pub mod keys {
    /// Key for the persisted cart item list.
    pub const CART: &str = "cart";

    /// Key for the persisted address book.
    pub const ADDRESSES: &str = "addresses";

    /// Key for the seeded product catalog.
    pub const CATALOG: &str = "catalog";

    /// Key for locally recorded orders.
    pub const ORDERS: &str = "orders";
}

/// A synchronous, string-keyed local store.
///
/// All operations are best-effort: callers that can tolerate data loss
/// (the cart) swallow errors, callers that cannot (the address book)
/// surface them.
pub trait KeyValueStore: Send + Sync {
    /// Load the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the store itself fails; a missing key is
    /// `Ok(None)`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the value cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Removing a missing key is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the store itself fails.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory store for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one `<key>.json` file per key under a base directory.
///
/// Keys are the well-known constants in [`keys`] and must be valid file
/// name stems.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.load("cart").unwrap(), None);

        store.save("cart", "{\"items\":[]}").unwrap();
        assert_eq!(store.load("cart").unwrap().as_deref(), Some("{\"items\":[]}"));

        store.remove("cart").unwrap();
        assert_eq!(store.load("cart").unwrap(), None);
    }

    #[test]
    fn test_memory_store_remove_missing_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("nothing").is_ok());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert_eq!(store.load(keys::CART).unwrap(), None);

        store.save(keys::CART, "[1,2,3]").unwrap();
        assert_eq!(store.load(keys::CART).unwrap().as_deref(), Some("[1,2,3]"));

        store.remove(keys::CART).unwrap();
        assert_eq!(store.load(keys::CART).unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_directory_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("profile").join("tiffin");
        let store = FileStore::new(&nested);

        store.save(keys::ADDRESSES, "[]").unwrap();
        assert!(nested.join("addresses.json").exists());
    }

    #[test]
    fn test_file_store_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.remove("nothing").is_ok());
    }
}
