//! Application state: the word source, the progress store and its backend.
//!
//! Handlers never touch storage keys directly; they go through the shared
//! `ProgressStore`. Every quiz operation holds `session` so a read-modify-write
//! of the progress set is not interleaved with another request's. The guarded
//! `SessionMemory` is the only record of progress when the store keeps nothing.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::progress::ProgressStore;
use crate::session::SessionMemory;
use crate::storage::{open_backend, KeyValueBackend, StorageError};
use crate::words::WordSource;

#[derive(Clone)]
pub struct AppState {
    pub words: WordSource,
    pub store: Arc<ProgressStore>,
    pub session: Arc<Mutex<SessionMemory>>,
    pub static_dir: PathBuf,
}

impl AppState {
    /// Build state from config: open the storage backend and point at the word list.
    #[instrument(level = "info", skip_all)]
    pub fn from_config(cfg: &AppConfig) -> Result<Self, StorageError> {
        let backend = open_backend(&cfg.storage)?;
        let state = Self::with_backend(
            WordSource::new(&cfg.words_path),
            backend,
            &cfg.storage.namespace,
            cfg.static_dir.clone(),
        );
        info!(
            target: "vocab_backend",
            words_path = %cfg.words_path.display(),
            storage = state.store.backend_kind(),
            namespace = %cfg.storage.namespace,
            "Application state ready"
        );
        if !state.store.is_persistent() {
            warn!(target: "vocab_backend", "Storage disabled; progress is kept in memory until restart");
        }
        Ok(state)
    }

    pub fn with_backend(
        words: WordSource,
        backend: Arc<dyn KeyValueBackend>,
        namespace: &str,
        static_dir: PathBuf,
    ) -> Self {
        Self {
            words,
            store: Arc::new(ProgressStore::new(backend, namespace)),
            session: Arc::new(Mutex::new(SessionMemory::default())),
            static_dir,
        }
    }
}
