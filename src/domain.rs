//! Domain models: words, per-word progress status, and daily answered counters.

use serde::{Deserialize, Serialize};

/// One flashcard entry parsed from the word list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
  pub id: String,
  pub word: String,
  pub meaning: String,
}

/// Where a word stands for the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  /// Never answered, or reset.
  Unknown,
  /// Mastered.
  Ok,
  /// Answered, still needs review.
  Ng,
}
impl Default for Status {
  fn default() -> Self { Status::Unknown }
}

impl Status {
  /// True for statuses that keep a word in the unanswered view.
  pub fn needs_review(self) -> bool {
    !matches!(self, Status::Ok)
  }

  pub fn is_answered(self) -> bool {
    matches!(self, Status::Ok | Status::Ng)
  }
}

/// The two user actions that move a word between states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
  Ok,
  Ng,
}

impl From<Answer> for Status {
  fn from(a: Answer) -> Self {
    match a {
      Answer::Ok => Status::Ok,
      Answer::Ng => Status::Ng,
    }
  }
}

impl std::fmt::Display for Answer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self { Answer::Ok => "ok", Answer::Ng => "ng" })
  }
}

/// Persisted status of one word. Field names match the stored JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordProgress {
  #[serde(rename = "wordId")]
  pub word_id: String,
  pub status: Status,
}

impl WordProgress {
  pub fn unknown(word_id: impl Into<String>) -> Self {
    Self { word_id: word_id.into(), status: Status::Unknown }
  }
}

/// Number of answers given on one calendar day (`YYYY-MM-DD`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAnsweredRecord {
  pub date: String,
  pub count: u32,
}
