use std::cell::RefCell;
use std::collections::HashMap;

use super::Storage;
use crate::error::StorageError;

/// Keeps every record in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Creates a storage that already holds the given records.
    pub fn with_records<K, V>(records: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let records = records.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        MemoryStorage { records: RefCell::new(records) }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.borrow().contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.records.borrow_mut().remove(key);
        Ok(())
    }
}
