#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use vocab_backend::storage::{KeyValueBackend, MemoryBackend};
use vocab_backend::words::WordSource;
use vocab_backend::{build_router, AppState};

pub const FIVE_WORDS: &str = "apple\ta fruit\tdog\tan animal\n\ncat\ta pet\nrun\tto move fast\tblue\ta colour\n";

pub struct TestApp {
    pub router: Router,
    pub backend: Arc<dyn KeyValueBackend>,
    pub words_path: PathBuf,
    _dir: TempDir,
}

pub fn create_test_app(words: Option<&str>) -> TestApp {
    create_test_app_with_backend(words, Arc::new(MemoryBackend::new()))
}

pub fn create_test_app_with_backend(words: Option<&str>, backend: Arc<dyn KeyValueBackend>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let words_path = dir.path().join("data.md");
    if let Some(content) = words {
        let mut f = std::fs::File::create(&words_path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    let state = AppState::with_backend(
        WordSource::new(&words_path),
        backend.clone(),
        "english-vocab",
        dir.path().join("static"),
    );

    TestApp {
        router: build_router(state),
        backend,
        words_path,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}
