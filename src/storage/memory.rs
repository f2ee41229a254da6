#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{StorageError, TokenStore};

/// In-process store. Contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a single entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.entries().insert(key.to_owned(), value.to_owned());
        store
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}
