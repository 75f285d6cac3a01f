//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Each call reloads the word list, opens a `QuizSession` against the shared
//! store (which synchronizes stored progress with the current word ids), and
//! returns a fresh view of the result. Store and word-file I/O is blocking, so
//! sessions run on the blocking pool while holding the session lock.

use chrono::Utc;
use tracing::{error, info, instrument, warn, Span};

use crate::dashboard::{self, DashboardStats};
use crate::domain::{Answer, Word, WordProgress};
use crate::error::{AppError, AppResult};
use crate::session::{AnswerOutcome, QuizSession, QuizSnapshot};
use crate::state::AppState;

async fn blocking<T, F>(f: F) -> AppResult<T>
where
  T: Send + 'static,
  F: FnOnce() -> AppResult<T> + Send + 'static,
{
  let span = Span::current();
  tokio::task::spawn_blocking(move || span.in_scope(f))
    .await
    .map_err(|e| {
      error!(target: "vocab_backend", error = %e, "Blocking task failed");
      AppError::internal("Internal error")
    })?
}

/// Run `f` on a session opened under the session lock, then keep its state
/// for the next call.
async fn with_session<T, F>(state: &AppState, f: F) -> AppResult<T>
where
  T: Send + 'static,
  F: FnOnce(&mut QuizSession<'_>) -> AppResult<T> + Send + 'static,
{
  let mut memory = state.session.clone().lock_owned().await;
  let state = state.clone();
  blocking(move || {
    let words = state.words.load_words()?;
    let mut session = QuizSession::resume(&state.store, words, &memory);
    let out = f(&mut session);
    *memory = session.remember();
    out
  })
  .await
}

#[instrument(level = "debug", skip(state))]
pub async fn load_words(state: &AppState) -> AppResult<Vec<Word>> {
  let words = state.words.clone();
  blocking(move || Ok(words.load_words()?)).await
}

#[instrument(level = "info", skip(state))]
pub async fn quiz_snapshot(state: &AppState) -> AppResult<QuizSnapshot> {
  with_session(state, |session| Ok(session.snapshot())).await
}

#[instrument(level = "info", skip(state))]
pub async fn submit_answer(
  state: &AppState,
  answer: Answer,
  word_id: Option<&str>,
) -> AppResult<(AnswerOutcome, QuizSnapshot)> {
  let expected = word_id.map(str::to_owned);
  with_session(state, move |session| {
    let current_id = match session.current() {
      Some(w) => w.id.clone(),
      None => return Err(AppError::not_found("No words left to answer")),
    };
    if let Some(expected) = expected {
      if expected != current_id {
        warn!(target: "quiz", %expected, current = %current_id, "Stale answer rejected");
        return Err(AppError::conflict(format!(
          "Word {} is not the current word (current: {})",
          expected, current_id
        )));
      }
    }

    let outcome = session
      .answer(answer)
      .ok_or_else(|| AppError::not_found("No words left to answer"))?;
    Ok((outcome, session.snapshot()))
  })
  .await
}

#[instrument(level = "info", skip(state))]
pub async fn reset_all(state: &AppState) -> AppResult<QuizSnapshot> {
  with_session(state, |session| {
    session.reset();
    info!(target: "quiz", words = session.words().len(), "Full reset via API");
    Ok(session.snapshot())
  })
  .await
}

#[instrument(level = "info", skip(state))]
pub async fn synced_progress(state: &AppState) -> AppResult<Vec<WordProgress>> {
  with_session(state, |session| Ok(session.progress().to_vec())).await
}

#[instrument(level = "info", skip(state))]
pub async fn dashboard_stats(state: &AppState) -> AppResult<DashboardStats> {
  let store = state.store.clone();
  with_session(state, move |session| {
    let daily = store.get_daily_answered_records();
    Ok(dashboard::compute(
      session.words().len(),
      session.progress(),
      session.total_answered(),
      &daily,
      Utc::now().date_naive(),
    ))
  })
  .await
}
