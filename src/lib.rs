//! Vocabulary flashcard backend.
//!
//! Serves a tab-separated word list, tracks per-word progress (unknown / ok /
//! ng) in a pluggable key-value store, drives the quiz over the words that
//! are not yet mastered, and computes dashboard statistics.

pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod logic;
pub mod progress;
pub mod protocol;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod util;
pub mod words;

pub use routes::build_router;
pub use state::AppState;
