//! JSON-file-backed store.
//!
//! The whole file is one JSON object. Entries this store did not write may
//! hold any JSON value; they are carried through untouched, and a non-string
//! value reads as absent. Writes go to a sibling temp file first and are
//! renamed into place, so a crash mid-write leaves the previous contents
//! intact.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{StorageError, TokenStore};

type Entries = BTreeMap<String, Value>;

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Entries::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.load()?.remove(key) {
            Some(Value::String(value)) => Ok(Some(value)),
            Some(_) | None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.insert(key.to_owned(), Value::String(value.to_owned()));
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&entries)
    }
}
