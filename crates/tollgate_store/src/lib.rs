//! Durable key/value storage for the tollgate check-in ledger.
//!
//! The ledger persists its state as a small set of string-valued keys and
//! commits them as one batch. This crate defines that storage contract and
//! two backends: an in-memory map for tests and dry runs, and a JSON file
//! replaced atomically on every write.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Store error type
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Format error: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Unsupported store URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;

/// Key/value storage contract for ledger persistence.
///
/// Values are opaque strings. `set_many` is the commit path: the ledger
/// hands over every key of a snapshot at once, and a backend applies the
/// batch so that a failed commit leaves the previously persisted snapshot
/// intact.
pub trait PersistenceStore: Send {
    /// Read a single value. Returns `None` for an absent key.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a single value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Write a batch of values as one durable unit.
    fn set_many(&mut self, entries: &[(String, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Remove all persisted keys.
    fn clear(&mut self) -> Result<()>;
}

/// Parsed store URL.
///
/// Schemes: `memory:` for the in-memory backend, `file:<path>` for the
/// JSON file backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUrl {
    Memory,
    File(PathBuf),
}

impl StoreUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim() == "memory:" {
            return Ok(Self::Memory);
        }
        if let Some(rest) = raw.strip_prefix("file:") {
            let path = rest.trim();
            if path.is_empty() {
                return Err(StoreError::InvalidUrl(format!(
                    "file URL missing path: {raw}"
                )));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        Err(StoreError::InvalidUrl(raw.to_string()))
    }

    /// Open the backend this URL names.
    pub fn open(&self) -> Result<Box<dyn PersistenceStore>> {
        match self {
            Self::Memory => Ok(Box::new(MemoryStore::new())),
            Self::File(path) => Ok(Box::new(FileStore::open(path.clone())?)),
        }
    }
}
