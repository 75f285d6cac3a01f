//! Key-value backends for persisted progress.
//!
//! The progress store only talks to `KeyValueBackend`. Which backend runs is a
//! startup decision (see `config::StorageKind`):
//!   - `FileBackend`: one JSON object on disk, rewritten atomically per write
//!   - `MemoryBackend`: process-local map, used by tests and `STORAGE_BACKEND=memory`
//!   - `UnavailableBackend`: no storage at all; the store degrades to no-ops

use std::sync::Arc;

use thiserror::Error;

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::config::{StorageConfig, StorageKind};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to persist storage file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("storage backend unavailable")]
    Unavailable,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// String-keyed, string-valued storage with a capability check.
pub trait KeyValueBackend: Send + Sync {
    /// Whether this backend can hold data at all. Callers skip every read and
    /// write when this is false.
    fn is_available(&self) -> bool {
        true
    }

    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Short label for logs.
    fn kind(&self) -> &'static str;
}

/// Backend for environments without persistent storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl KeyValueBackend for UnavailableBackend {
    fn is_available(&self) -> bool {
        false
    }

    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(StorageError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StorageError::Unavailable)
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(StorageError::Unavailable)
    }

    fn kind(&self) -> &'static str {
        "unavailable"
    }
}

/// Build the configured backend.
pub fn open_backend(cfg: &StorageConfig) -> Result<Arc<dyn KeyValueBackend>> {
    Ok(match cfg.kind {
        StorageKind::File => Arc::new(FileBackend::open(&cfg.path)?),
        StorageKind::Memory => Arc::new(MemoryBackend::new()),
        StorageKind::None => Arc::new(UnavailableBackend),
    })
}
