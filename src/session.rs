//! Quiz session: the ordered "unanswered" view over the word list, the resume
//! position inside it, and the OK/NG transitions.
//!
//! Per word the states are unknown → ok | ng, ok ⇄ ng, driven only by
//! explicit answers. A word leaves the view once it is `ok`.
//!
//! Transitions are applied immediately; any pause before showing the next
//! card is up to the client.
//!
//! When the store is not persistent, progress and position live in a
//! `SessionMemory` carried between sessions by the caller.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{Answer, Status, Word, WordProgress};
use crate::progress::{apply_answer, sync_progress, ProgressStore};

/// Words whose status is `unknown`, `ng` or missing, in word-list order.
pub fn unanswered<'a>(words: &'a [Word], progress: &[WordProgress]) -> Vec<&'a Word> {
    let status: HashMap<&str, Status> = progress
        .iter()
        .map(|p| (p.word_id.as_str(), p.status))
        .collect();
    words
        .iter()
        .filter(|w| status.get(w.id.as_str()).map_or(true, |s| s.needs_review()))
        .collect()
}

/// Resume position for a view of `len` words: out-of-range indices restart at 0.
pub fn resolve_index(saved: usize, len: usize) -> usize {
    if saved < len {
        saved
    } else {
        0
    }
}

/// Position after an answer, given the view length after the transition.
pub fn next_index(current: usize, len_after: usize) -> usize {
    if current + 1 < len_after {
        current + 1
    } else {
        0
    }
}

/// What an answer did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub word_id: String,
    pub status: Status,
    pub next_index: usize,
}

/// Serializable view of the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSnapshot {
    pub current: Option<Word>,
    pub index: usize,
    pub remaining: usize,
    pub total_words: usize,
    pub mastered: usize,
}

/// Progress and position kept outside the store, for backends that keep nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionMemory {
    pub progress: Vec<WordProgress>,
    pub index: usize,
}

pub struct QuizSession<'s> {
    store: &'s ProgressStore,
    words: Vec<Word>,
    progress: Vec<WordProgress>,
    index: usize,
}

impl<'s> QuizSession<'s> {
    /// Synchronize stored progress with `words` and resume at the saved index.
    pub fn open(store: &'s ProgressStore, words: Vec<Word>) -> Self {
        Self::resume(store, words, &SessionMemory::default())
    }

    /// Like [`open`](Self::open), but a store that keeps nothing resumes from
    /// `memory` instead.
    #[instrument(level = "debug", skip_all, fields(words = words.len(), persistent = store.is_persistent()))]
    pub fn resume(store: &'s ProgressStore, words: Vec<Word>, memory: &SessionMemory) -> Self {
        let ids: Vec<&str> = words.iter().map(|w| w.id.as_str()).collect();
        let (progress, saved) = if store.is_persistent() {
            store.initialize_progress(&ids, false);
            (store.get_progress(), store.get_current_index())
        } else {
            let mut progress = memory.progress.clone();
            sync_progress(&mut progress, &ids);
            (progress, memory.index)
        };

        let mut session = Self {
            store,
            words,
            progress,
            index: 0,
        };
        let remaining = session.unanswered().len();
        session.index = resolve_index(saved, remaining);
        debug!(target: "quiz", saved, resumed = session.index, remaining, "Quiz session opened");
        session
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn progress(&self) -> &[WordProgress] {
        &self.progress
    }

    pub fn unanswered(&self) -> Vec<&Word> {
        unanswered(&self.words, &self.progress)
    }

    pub fn current(&self) -> Option<&Word> {
        self.unanswered().get(self.index).copied()
    }

    pub fn mastered(&self) -> usize {
        self.progress.iter().filter(|p| p.status == Status::Ok).count()
    }

    /// Words answered at least once.
    pub fn total_answered(&self) -> usize {
        if self.store.is_persistent() {
            self.store.get_total_answered_count()
        } else {
            self.progress.iter().filter(|p| p.status.is_answered()).count()
        }
    }

    /// State to hand to the next [`resume`](Self::resume).
    pub fn remember(&self) -> SessionMemory {
        SessionMemory {
            progress: self.progress.clone(),
            index: self.index,
        }
    }

    /// Apply `answer` to the current word and advance. `None` when there is
    /// nothing left to answer.
    #[instrument(level = "info", skip(self))]
    pub fn answer(&mut self, answer: Answer) -> Option<AnswerOutcome> {
        let word_id = self.current()?.id.clone();

        self.store.update_word_status(&word_id, answer);
        self.store.record_answered();
        if self.store.is_persistent() {
            self.progress = self.store.get_progress();
        } else {
            apply_answer(&mut self.progress, &word_id, answer);
        }

        let remaining = self.unanswered().len();
        self.index = next_index(self.index, remaining);
        self.store.save_current_index(self.index);

        info!(target: "quiz", %word_id, %answer, next = self.index, remaining, "Answer recorded");
        Some(AnswerOutcome {
            word_id,
            status: answer.into(),
            next_index: self.index,
        })
    }

    /// Forget every answer and counter, and start again from the first word.
    #[instrument(level = "info", skip(self))]
    pub fn reset(&mut self) {
        let ids: Vec<&str> = self.words.iter().map(|w| w.id.as_str()).collect();
        self.store.reset_progress();
        self.store.initialize_progress(&ids, true);
        self.progress = if self.store.is_persistent() {
            self.store.get_progress()
        } else {
            ids.into_iter().map(WordProgress::unknown).collect()
        };
        self.index = 0;
        info!(target: "quiz", words = self.words.len(), "Progress reset");
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        let view = self.unanswered();
        QuizSnapshot {
            current: view.get(self.index).map(|w| (*w).clone()),
            index: self.index,
            remaining: view.len(),
            total_words: self.words.len(),
            mastered: self.mastered(),
        }
    }
}
