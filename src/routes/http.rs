//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs basic result info.

use axum::{extract::State, Json};
use tracing::{info, instrument};

use crate::dashboard::DashboardStats;
use crate::domain::{Word, WordProgress};
use crate::error::AppResult;
use crate::logic::*;
use crate::protocol::*;
use crate::session::QuizSnapshot;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<AppState>) -> Json<HealthOut> {
  Json(HealthOut { ok: true, storage: state.store.backend_kind() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_words(State(state): State<AppState>) -> AppResult<Json<Vec<Word>>> {
  let words = load_words(&state).await?;
  info!(target: "vocab_backend", count = words.len(), "HTTP word list served");
  Ok(Json(words))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_progress(State(state): State<AppState>) -> AppResult<Json<Vec<WordProgress>>> {
  Ok(Json(synced_progress(&state).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_quiz(State(state): State<AppState>) -> AppResult<Json<QuizSnapshot>> {
  let quiz = quiz_snapshot(&state).await?;
  info!(target: "quiz", index = quiz.index, remaining = quiz.remaining, "HTTP quiz served");
  Ok(Json(quiz))
}

#[instrument(level = "info", skip(state, body), fields(status = %body.status, word_id = ?body.word_id))]
pub async fn http_post_answer(
  State(state): State<AppState>,
  Json(body): Json<AnswerIn>,
) -> AppResult<Json<AnswerOut>> {
  let (outcome, quiz) = submit_answer(&state, body.status, body.word_id.as_deref()).await?;
  info!(target: "quiz", word_id = %outcome.word_id, next = outcome.next_index, "HTTP answer applied");
  Ok(Json(AnswerOut { outcome, quiz }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_reset(State(state): State<AppState>) -> AppResult<Json<QuizSnapshot>> {
  Ok(Json(reset_all(&state).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
  Ok(Json(dashboard_stats(&state).await?))
}
