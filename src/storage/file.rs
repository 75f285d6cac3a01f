//! Single-file JSON backend.
//!
//! Layout on disk is one JSON object mapping key → stored string, e.g.
//! ```json
//! { "english-vocab-current-index": "4", "english-vocab-progress": "[...]" }
//! ```
//! Every mutation rewrites the whole file through a temp file in the same
//! directory followed by a rename.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{KeyValueBackend, Result};

#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileBackend {
    /// Open (or lazily create) the storage file. A missing file starts empty;
    /// an unreadable or malformed one is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        info!(target: "storage", path = %path.display(), keys = entries.len(), "Opened file storage");
        Ok(Self { path, entries: RwLock::new(entries) })
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let temp_file = NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(&temp_file);
            serde_json::to_writer_pretty(&mut writer, entries)?;
            writer.flush()?;
        }
        temp_file.persist(&self.path)?;
        debug!(target: "storage", path = %self.path.display(), keys = entries.len(), "Flushed storage file");
        Ok(())
    }

    /// Apply `edit` to a copy of the map, persist it, then publish it. The
    /// in-memory view only changes when the disk write succeeded.
    fn mutate(&self, edit: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        edit(&mut next);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|m| {
            m.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.entries.read().contains_key(key) {
            return Ok(());
        }
        self.mutate(|m| {
            m.remove(key);
        })
    }

    fn kind(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("progress.json");

        let b = FileBackend::open(&path).unwrap();
        b.set("english-vocab-current-index", "4").unwrap();
        b.set("gone", "x").unwrap();
        b.remove("gone").unwrap();
        drop(b);

        let reopened = FileBackend::open(&path).unwrap();
        assert_eq!(reopened.get("english-vocab-current-index").unwrap().as_deref(), Some("4"));
        assert_eq!(reopened.get("gone").unwrap(), None);
    }

    #[test]
    fn malformed_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(FileBackend::open(&path), Err(StorageError::Json(_))));
    }

    #[test]
    fn empty_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "").unwrap();
        let b = FileBackend::open(&path).unwrap();
        assert_eq!(b.get("anything").unwrap(), None);
    }
}
