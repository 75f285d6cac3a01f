use axum::http::StatusCode;
use serde_json::json;

use std::sync::Arc;

use vocab_backend::storage::{KeyValueBackend, UnavailableBackend};

mod common;

use common::{create_test_app, create_test_app_with_backend, FIVE_WORDS};

#[tokio::test]
async fn test_health() {
    let app = create_test_app(Some(FIVE_WORDS));
    let (status, body) = app.get("/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "storage": "memory" }));
}

#[tokio::test]
async fn test_words_are_served_in_file_order() {
    let app = create_test_app(Some(FIVE_WORDS));
    let (status, body) = app.get("/api/words").await;
    assert_eq!(status, StatusCode::OK);

    let words = body.as_array().unwrap();
    assert_eq!(words.len(), 5);
    assert_eq!(words[0], json!({ "id": "word-0", "word": "apple", "meaning": "a fruit" }));
    assert_eq!(words[4]["id"], "word-4");
    assert_eq!(words[4]["word"], "blue");
}

#[tokio::test]
async fn test_missing_word_file_is_a_generic_500() {
    let app = create_test_app(None);
    let (status, body) = app.get("/api/words").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to load words" }));

    let (status, _) = app.get("/api/v1/quiz").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_progress_is_initialized_on_first_read() {
    let app = create_test_app(Some("apple\ta fruit\n"));
    let (status, body) = app.get("/api/v1/progress").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "wordId": "word-0", "status": "unknown" }]));
    assert!(app.backend.get("english-vocab-progress").unwrap().is_some());
}

#[tokio::test]
async fn test_single_word_answered_ok() {
    let app = create_test_app(Some("apple\ta fruit\n"));

    let (_, quiz) = app.get("/api/v1/quiz").await;
    assert_eq!(quiz["current"]["word"], "apple");
    assert_eq!(quiz["remaining"], 1);

    let (status, body) = app.post("/api/v1/quiz/answer", json!({ "status": "ok" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], json!({ "wordId": "word-0", "status": "ok", "nextIndex": 0 }));
    assert_eq!(body["quiz"]["remaining"], 0);
    assert_eq!(body["quiz"]["current"], serde_json::Value::Null);

    let (_, stats) = app.get("/api/v1/dashboard").await;
    assert_eq!(stats["totalAnswered"], 1);
    assert_eq!(stats["okCount"], 1);
    assert_eq!(stats["progressPercent"], 100);

    let (status, _) = app.post("/api/v1/quiz/answer", json!({ "status": "ng" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stale_answer_is_rejected() {
    let app = create_test_app(Some(FIVE_WORDS));
    let (status, body) = app
        .post("/api/v1/quiz/answer", json!({ "status": "ok", "wordId": "word-3" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("word-3"));

    let (status, body) = app
        .post("/api/v1/quiz/answer", json!({ "status": "ng", "wordId": "word-0" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quiz"]["current"]["id"], "word-1");
}

#[tokio::test]
async fn test_invalid_status_is_rejected() {
    let app = create_test_app(Some(FIVE_WORDS));
    let (status, _) = app.post("/api/v1/quiz/answer", json!({ "status": "unknown" })).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_reset_after_three_answers() {
    let app = create_test_app(Some(FIVE_WORDS));
    for _ in 0..3 {
        let (status, _) = app.post("/api/v1/quiz/answer", json!({ "status": "ok" })).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, stats) = app.get("/api/v1/dashboard").await;
    assert_eq!(stats["okCount"], 3);
    assert_eq!(stats["daily"].as_array().unwrap().last().unwrap()["count"], 3);

    let (status, quiz) = app.post("/api/v1/progress/reset", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quiz["index"], 0);
    assert_eq!(quiz["remaining"], 5);
    assert_eq!(quiz["current"]["id"], "word-0");

    let (_, progress) = app.get("/api/v1/progress").await;
    let progress = progress.as_array().unwrap();
    assert_eq!(progress.len(), 5);
    assert!(progress.iter().all(|p| p["status"] == "unknown"));
    assert_eq!(app.backend.get("english-vocab-daily-answered").unwrap(), None);
    assert_eq!(app.backend.get("english-vocab-current-index").unwrap(), None);
}

#[tokio::test]
async fn test_resume_index_clamps_when_view_shrinks() {
    let app = create_test_app(Some(FIVE_WORDS));
    for _ in 0..3 {
        app.post("/api/v1/quiz/answer", json!({ "status": "ok" })).await;
    }
    app.backend.set("english-vocab-current-index", "4").unwrap();

    let (_, quiz) = app.get("/api/v1/quiz").await;
    assert_eq!(quiz["remaining"], 2);
    assert_eq!(quiz["index"], 0);
}

#[tokio::test]
async fn test_word_list_changes_are_synchronized() {
    let app = create_test_app(Some(FIVE_WORDS));
    app.post("/api/v1/quiz/answer", json!({ "status": "ng" })).await;

    std::fs::write(&app.words_path, "apple\ta fruit\tdog\tan animal\n").unwrap();
    let (_, progress) = app.get("/api/v1/progress").await;
    assert_eq!(
        progress,
        json!([
            { "wordId": "word-0", "status": "ng" },
            { "wordId": "word-1", "status": "unknown" }
        ])
    );
}

#[tokio::test]
async fn test_quiz_advances_without_storage() {
    let app = create_test_app_with_backend(Some(FIVE_WORDS), Arc::new(UnavailableBackend));
    let (_, health) = app.get("/api/v1/health").await;
    assert_eq!(health["storage"], "unavailable");

    let mut expected = "word-0".to_string();
    for _ in 0..3 {
        let (status, quiz) = app.get("/api/v1/quiz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(quiz["current"]["id"], expected.as_str());

        let (status, body) = app
            .post("/api/v1/quiz/answer", json!({ "status": "ng", "wordId": expected }))
            .await;
        assert_eq!(status, StatusCode::OK);
        expected = body["quiz"]["current"]["id"].as_str().unwrap().to_string();
    }
    assert_eq!(expected, "word-3");

    let (status, body) = app
        .post("/api/v1/quiz/answer", json!({ "status": "ok", "wordId": "word-3" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quiz"]["remaining"], 4);

    let (_, stats) = app.get("/api/v1/dashboard").await;
    assert_eq!(stats["okCount"], 1);
    assert_eq!(stats["ngCount"], 3);
    assert_eq!(stats["totalAnswered"], 4);

    let (_, quiz) = app.post("/api/v1/progress/reset", json!({})).await;
    assert_eq!(quiz["remaining"], 5);
    assert_eq!(quiz["current"]["id"], "word-0");
}

#[tokio::test]
async fn test_ws_messages_dispatch() {
    use vocab_backend::protocol::{ClientWsMessage, ServerWsMessage};
    use vocab_backend::routes::ws::handle_client_ws;
    use vocab_backend::storage::MemoryBackend;
    use vocab_backend::words::WordSource;
    use vocab_backend::AppState;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.md");
    std::fs::write(&path, FIVE_WORDS).unwrap();
    let state = AppState::with_backend(
        WordSource::new(&path),
        std::sync::Arc::new(MemoryBackend::new()),
        "english-vocab",
        dir.path().join("static"),
    );

    let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"answer","status":"ok"}"#).unwrap();
    match handle_client_ws(msg, &state).await {
        ServerWsMessage::Answered { outcome, quiz } => {
            assert_eq!(outcome.word_id, "word-0");
            assert_eq!(quiz.remaining, 4);
        }
        other => panic!("unexpected reply: {other:?}"),
    }

    let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
    assert!(matches!(handle_client_ws(msg, &state).await, ServerWsMessage::Pong));

    let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"dashboard"}"#).unwrap();
    match handle_client_ws(msg, &state).await {
        ServerWsMessage::Dashboard { stats } => assert_eq!(stats.ok_count, 1),
        other => panic!("unexpected reply: {other:?}"),
    }

    std::fs::remove_file(&path).unwrap();
    let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"quiz"}"#).unwrap();
    match handle_client_ws(msg, &state).await {
        ServerWsMessage::Error { message } => assert_eq!(message, "Failed to load words"),
        other => panic!("unexpected reply: {other:?}"),
    }
}
