//! Word list loading.
//!
//! The source file is plain text: one or more tab-separated `word<TAB>meaning`
//! pairs per line. Blank lines and blank fields are skipped, and a trailing
//! field without a partner is ignored.
//!
//! Example line:
//!   "apple\ta fruit\tdog\tan animal"  →  word-0 (apple), word-1 (dog)

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::Word;

#[derive(Error, Debug)]
pub enum WordSourceError {
  #[error("failed to read word list {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Parse word list content. Ids are assigned from a zero-based counter over
/// every accepted pair, so they are only stable for identical content.
pub fn parse_words(content: &str) -> Vec<Word> {
  let mut words = Vec::new();
  let mut next_id = 0usize;

  for line in content.split('\n') {
    if line.trim().is_empty() {
      continue;
    }
    let fields: Vec<&str> = line
      .split('\t')
      .map(str::trim)
      .filter(|f| !f.is_empty())
      .collect();

    for pair in fields.chunks_exact(2) {
      words.push(Word {
        id: format!("word-{}", next_id),
        word: pair[0].to_string(),
        meaning: pair[1].to_string(),
      });
      next_id += 1;
    }
  }
  words
}

/// File-backed word source. Every load re-reads the file.
#[derive(Clone, Debug)]
pub struct WordSource {
  path: PathBuf,
}

impl WordSource {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
  pub fn load_words(&self) -> Result<Vec<Word>, WordSourceError> {
    let content = std::fs::read_to_string(&self.path).map_err(|source| WordSourceError::Read {
      path: self.path.clone(),
      source,
    })?;
    let words = parse_words(&content);
    debug!(target: "vocab_backend", count = words.len(), "Parsed word list");
    Ok(words)
  }
}
