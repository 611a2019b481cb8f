//! Client-local key-value persistence. Every record is a JSON document stored
//! under a string key and replaced as a whole on every write.

mod file;
mod memory;

use serde::Serialize;

pub use file::FileStorage;
pub(crate) use file::file_stem;
pub use memory::MemoryStorage;

use crate::error::StorageError;

/// A key-value store holding whole JSON documents.
///
/// Receivers are shared because the stores of one session write to the same
/// storage; implementations use interior mutability and are not meant to be
/// shared across threads.
pub trait Storage {
    /// Returns the raw document stored under `key`, or `None` if there is none.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the document stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes the document stored under `key`. Deleting a missing key is not
    /// an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Serializes `value` and stores it under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let document = serde_json::to_string(value)
        .map_err(|source| StorageError::Serialize { key: key.to_string(), source })?;
    storage.set(key, &document)
}

/// Reads the document under `key`, treating a failed read as a missing record.
pub(crate) fn read_or_absent(storage: &dyn Storage, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(document) => document,
        Err(err) => {
            tracing::warn!(key, error = %err, "could not read stored record, ignoring it");
            None
        }
    }
}

/// Deletes a record that failed to load so the next write starts clean.
pub(crate) fn discard(storage: &dyn Storage, key: &str) {
    if let Err(err) = storage.remove(key) {
        tracing::error!(key, error = %err, "could not discard corrupted record");
    }
}

/// A store whose every operation fails, for exercising the error paths of the
/// stores built on top of it.
#[cfg(test)]
pub(crate) struct UnavailableStorage;

#[cfg(test)]
impl UnavailableStorage {
    fn error(key: &str) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "storage unavailable"),
        }
    }
}

#[cfg(test)]
impl Storage for UnavailableStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Err(Self::error(key))
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(Self::error(key))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Err(Self::error(key))
    }
}
