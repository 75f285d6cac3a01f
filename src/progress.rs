//! Progress store: per-word status, daily answered counters and the resume
//! index, persisted under namespaced keys in a `KeyValueBackend`.
//!
//! Nothing here returns storage errors. Reads fall back to empty/default
//! values and failed writes are logged, so a broken or missing backend never
//! blocks a quiz. When the backend reports itself unavailable, every call is
//! a no-op.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, instrument, warn};

use crate::domain::{Answer, DailyAnsweredRecord, WordProgress};
use crate::storage::KeyValueBackend;

/// Fully qualified storage keys for one namespace.
#[derive(Clone, Debug)]
pub struct StorageKeys {
    pub progress: String,
    pub daily_answered: String,
    /// Older builds counted only NG answers under this key. Read once to seed
    /// `daily_answered`, cleared on reset.
    pub legacy_daily_ng: String,
    pub current_index: String,
}

impl StorageKeys {
    pub fn new(namespace: &str) -> Self {
        Self {
            progress: format!("{namespace}-progress"),
            daily_answered: format!("{namespace}-daily-answered"),
            legacy_daily_ng: format!("{namespace}-daily-ng"),
            current_index: format!("{namespace}-current-index"),
        }
    }
}

/// Set `word_id` to the status `answer` gives it, appending a record if the
/// id has none.
pub fn apply_answer(progress: &mut Vec<WordProgress>, word_id: &str, answer: Answer) {
    match progress.iter_mut().find(|p| p.word_id == word_id) {
        Some(p) => p.status = answer.into(),
        None => progress.push(WordProgress {
            word_id: word_id.to_string(),
            status: answer.into(),
        }),
    }
}

/// Align `progress` with `word_ids`: unseen ids are appended as `unknown`,
/// records for ids no longer listed are dropped, the rest keep their status.
/// Returns `true` if anything was added or dropped.
pub fn sync_progress<S: AsRef<str>>(progress: &mut Vec<WordProgress>, word_ids: &[S]) -> bool {
    let existing: HashSet<String> = progress.iter().map(|p| p.word_id.clone()).collect();
    let before = progress.len();
    for id in word_ids {
        if !existing.contains(id.as_ref()) {
            progress.push(WordProgress::unknown(id.as_ref()));
        }
    }
    let added = progress.len() - before;

    let wanted: HashSet<&str> = word_ids.iter().map(|id| id.as_ref()).collect();
    let len = progress.len();
    progress.retain(|p| wanted.contains(p.word_id.as_str()));
    let pruned = len - progress.len();

    if added > 0 || pruned > 0 {
        debug!(target: "storage", added, pruned, "Synchronized progress with word list");
        true
    } else {
        false
    }
}

pub struct ProgressStore {
    backend: Arc<dyn KeyValueBackend>,
    keys: StorageKeys,
}

impl ProgressStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>, namespace: &str) -> Self {
        Self {
            backend,
            keys: StorageKeys::new(namespace),
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.backend.is_available()
    }

    pub fn backend_kind(&self) -> &'static str {
        self.backend.kind()
    }

    /// Raw stored value. An empty string counts as absent.
    fn read_raw(&self, key: &str) -> Option<String> {
        if !self.backend.is_available() {
            return None;
        }
        match self.backend.get(key) {
            Ok(v) => v.filter(|s| !s.is_empty()),
            Err(e) => {
                warn!(target: "storage", %key, error = %e, "Storage read failed");
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(target: "storage", %key, error = %e, "Discarding corrupt stored value");
                None
            }
        }
    }

    fn write_raw(&self, key: &str, value: &str, what: &'static str) {
        if !self.backend.is_available() {
            return;
        }
        if let Err(e) = self.backend.set(key, value) {
            error!(target: "storage", %key, error = %e, "Failed to save {}", what);
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T, what: &'static str) {
        if !self.backend.is_available() {
            return;
        }
        match serde_json::to_string(value) {
            Ok(s) => self.write_raw(key, &s, what),
            Err(e) => error!(target: "storage", %key, error = %e, "Failed to encode {}", what),
        }
    }

    /// Persisted progress records, in stored order.
    pub fn get_progress(&self) -> Vec<WordProgress> {
        self.read_json(&self.keys.progress).unwrap_or_default()
    }

    /// Overwrite the whole progress set in a single write.
    pub fn save_progress(&self, progress: &[WordProgress]) {
        self.write_json(&self.keys.progress, progress, "progress");
    }

    /// Upsert one word's status.
    #[instrument(level = "debug", skip(self))]
    pub fn update_word_status(&self, word_id: &str, answer: Answer) {
        if !self.backend.is_available() {
            return;
        }
        let mut progress = self.get_progress();
        apply_answer(&mut progress, word_id, answer);
        self.save_progress(&progress);
    }

    /// Bring the progress set in line with `word_ids`.
    ///
    /// With `reset`, every id starts over as `unknown`. Otherwise see
    /// [`sync_progress`]; nothing is written when the set is already in line.
    #[instrument(level = "debug", skip(self, word_ids), fields(ids = word_ids.len()))]
    pub fn initialize_progress<S: AsRef<str>>(&self, word_ids: &[S], reset: bool) {
        if !self.backend.is_available() {
            return;
        }
        if reset {
            let fresh: Vec<WordProgress> =
                word_ids.iter().map(|id| WordProgress::unknown(id.as_ref())).collect();
            self.save_progress(&fresh);
            return;
        }

        let mut progress = self.get_progress();
        if sync_progress(&mut progress, word_ids) {
            self.save_progress(&progress);
        }
    }

    /// Clear progress, daily counters and the resume index. Each key is
    /// removed independently; one failure does not stop the others.
    #[instrument(level = "info", skip(self))]
    pub fn reset_progress(&self) {
        if !self.backend.is_available() {
            return;
        }
        for key in [
            &self.keys.progress,
            &self.keys.daily_answered,
            &self.keys.legacy_daily_ng,
            &self.keys.current_index,
        ] {
            if let Err(e) = self.backend.remove(key) {
                error!(target: "storage", %key, error = %e, "Failed to reset progress key");
            }
        }
    }

    /// Count one answer for today (UTC).
    pub fn record_answered(&self) {
        self.record_answered_on(Utc::now().date_naive());
    }

    /// Count one answer for `date`. If the current key has never been written,
    /// counts already stored under the legacy key are carried over.
    #[instrument(level = "debug", skip(self))]
    pub fn record_answered_on(&self, date: NaiveDate) {
        if !self.backend.is_available() {
            return;
        }
        let day = date.format("%Y-%m-%d").to_string();

        let mut records: Vec<DailyAnsweredRecord> = match self.read_raw(&self.keys.daily_answered) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(r) => r,
                Err(e) => {
                    error!(target: "storage", error = %e, "Failed to record answered: corrupt daily records");
                    return;
                }
            },
            None => match self.read_raw(&self.keys.legacy_daily_ng) {
                Some(raw) => match serde_json::from_str(&raw) {
                    Ok(r) => {
                        debug!(target: "storage", "Migrating legacy daily NG records");
                        r
                    }
                    Err(e) => {
                        error!(target: "storage", error = %e, "Failed to record answered: corrupt legacy daily records");
                        return;
                    }
                },
                None => Vec::new(),
            },
        };

        match records.iter_mut().find(|r| r.date == day) {
            Some(r) => r.count += 1,
            None => records.push(DailyAnsweredRecord { date: day, count: 1 }),
        }
        self.write_json(&self.keys.daily_answered, &records, "daily answered records");
    }

    pub fn get_daily_answered_records(&self) -> Vec<DailyAnsweredRecord> {
        self.read_json(&self.keys.daily_answered).unwrap_or_default()
    }

    /// Words answered at least once (status `ok` or `ng`).
    pub fn get_total_answered_count(&self) -> usize {
        self.get_progress()
            .iter()
            .filter(|p| p.status.is_answered())
            .count()
    }

    pub fn save_current_index(&self, index: usize) {
        self.write_raw(&self.keys.current_index, &index.to_string(), "current index");
    }

    /// Saved resume index; 0 when absent or unparsable.
    pub fn get_current_index(&self) -> usize {
        self.read_raw(&self.keys.current_index)
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(0)
    }
}
