//! Vocabulary flashcard backend
//!
//! - Axum HTTP + WebSocket API
//! - Progress persisted through a key-value backend (file, memory or none)
//! - Static SPA fallback (STATIC_DIR/index.html)
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   WORDS_PATH        : tab-separated word list (default "data.md")
//!   STORAGE_BACKEND   : "file" (default), "memory" or "none"
//!   STORAGE_PATH      : progress file for the file backend (default "./progress.json")
//!   STORAGE_NAMESPACE : key prefix (default "english-vocab")
//!   STATIC_DIR        : front-end directory (default "./static")
//!   VOCAB_CONFIG_PATH : optional TOML config with the same settings
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use vocab_backend::config::AppConfig;
use vocab_backend::{build_router, telemetry, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = AppConfig::load();
  let state = AppState::from_config(&cfg)?;
  let app = build_router(state);

  let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "vocab_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "vocab_backend", error = %e, "Failed to listen for shutdown signal");
  }
  info!(target: "vocab_backend", "Shutting down");
}
