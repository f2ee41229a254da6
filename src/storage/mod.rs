//! Persistent key/value storage for the credential token.
//!
//! DESIGN
//! ======
//! Storage is an injected capability rather than ambient global state.
//! `FileStore` persists across CLI invocations the way browser local
//! storage persists across page loads; `MemoryStore` backs tests and
//! embedders that keep the session in-process.
//!
//! ERROR HANDLING
//! ==============
//! Implementations report failures; callers in `session` decide how to
//! degrade (an unreadable store means "no token", never a crash).

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage key holding the credential token.
pub const TOKEN_KEY: &str = "userToken";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage contents are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Synchronous string key/value store.
///
/// Removing an absent key must succeed.
pub trait TokenStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
