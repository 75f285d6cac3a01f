//! HTTP-facing error type. Internal layers keep their own `thiserror` enums;
//! handlers convert into `AppError` at the edge.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::words::WordSourceError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
  pub error: String,
}

#[derive(Debug, Clone)]
pub struct AppError {
  status: StatusCode,
  message: String,
}

impl AppError {
  pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
    Self { status, message: message.into() }
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::new(StatusCode::NOT_FOUND, message)
  }

  pub fn conflict(message: impl Into<String>) -> Self {
    Self::new(StatusCode::CONFLICT, message)
  }

  pub fn internal(message: impl Into<String>) -> Self {
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

impl std::fmt::Display for AppError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} {}", self.status.as_u16(), self.message)
  }
}

impl std::error::Error for AppError {}

/// Word list failures reach clients as a generic 500; details go to the log.
impl From<WordSourceError> for AppError {
  fn from(e: WordSourceError) -> Self {
    error!(target: "vocab_backend", error = %e, "Error parsing words");
    AppError::internal("Failed to load words")
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    (self.status, Json(ErrorBody { error: self.message })).into_response()
  }
}

pub type AppResult<T> = Result<T, AppError>;
