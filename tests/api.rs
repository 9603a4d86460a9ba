// End-to-end tests exercising the HTTP surface in process:
// request → validation → engine → chunker/emitter → response.
// Uses tower::ServiceExt::oneshot with a scripted mock engine.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use ragline::api::{self, state::AppState};
use ragline::engine::mock::{MockEngine, MockReply};
use ragline::metrics::Metrics;
use ragline::streaming::StreamOptions;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_app(engine: Arc<MockEngine>) -> (Router, Arc<Metrics>) {
    let state = AppState::new(engine).with_stream_options(StreamOptions::default().immediate());
    let metrics = state.metrics.clone();
    (api::router(state), metrics)
}

async fn send_json(app: Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn sse_payloads(body: &[u8]) -> Vec<String> {
    String::from_utf8(body.to_vec())
        .unwrap()
        .split("\n\n")
        .filter(|frame| !frame.trim().is_empty())
        .map(|frame| {
            frame
                .trim()
                .strip_prefix("data: ")
                .unwrap_or(frame)
                .to_string()
        })
        .collect()
}

fn chat_body(content: &str, stream: bool) -> Value {
    json!({
        "messages": [{ "role": "user", "content": content }],
        "stream": stream,
    })
}

#[tokio::test]
async fn health_reports_version() {
    let (app, _) = test_app(Arc::new(MockEngine::from_replies(vec![])));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn chat_returns_structured_reply() {
    let engine = Arc::new(MockEngine::from_replies(vec![MockReply::answer(
        "X is Y.",
        vec!["doc1"],
    )]));
    let (app, _) = test_app(engine);

    let (status, body) = send_json(app, "/chat", chat_body("What is X?", false)).await;
    assert_eq!(status, StatusCode::OK);

    let reply: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(reply["message"]["role"], "assistant");
    assert_eq!(reply["message"]["content"], "X is Y.");
    assert_eq!(reply["sources"], json!(["doc1"]));
}

#[tokio::test]
async fn chat_rejects_empty_messages() {
    let (app, _) = test_app(Arc::new(MockEngine::from_replies(vec![])));

    let (status, body) = send_json(
        app,
        "/chat",
        json!({ "messages": [], "stream": false }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(detail["detail"], "No messages provided");
}

#[tokio::test]
async fn chat_rejects_non_user_final_message() {
    let (app, _) = test_app(Arc::new(MockEngine::from_replies(vec![])));

    let (status, body) = send_json(
        app,
        "/chat",
        json!({
            "messages": [
                { "role": "user", "content": "hi" },
                { "role": "assistant", "content": "hello" }
            ],
            "stream": false,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(detail["detail"], "Last message must be from user");
}

#[tokio::test]
async fn chat_engine_failure_is_a_server_error() {
    let engine = Arc::new(MockEngine::from_replies(vec![MockReply::error(
        "vector store unreachable",
    )]));
    let (app, _) = test_app(engine);

    let (status, body) = send_json(app, "/chat", chat_body("What is X?", false)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let detail: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(detail["detail"], "vector store unreachable");
}

#[tokio::test]
async fn streaming_chat_delivers_ordered_events() {
    // Six 10-char words: 65 chars, three chunks at the default bound of 30.
    let words: Vec<String> = (0..6).map(|i| format!("word-{i:04}!")).collect();
    let answer = words.join(" ");
    assert_eq!(answer.len(), 65);

    let engine = Arc::new(MockEngine::from_replies(vec![MockReply::answer(
        answer.clone(),
        vec![],
    )]));
    let (app, _) = test_app(engine);

    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&chat_body("tell me", true)).unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"));

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let events = sse_payloads(&bytes);

    // ack + 3 chunks + terminal marker, no sources footer.
    assert_eq!(events.len(), 5);
    assert_eq!(events[0], "Thinking...");
    assert_eq!(events[1..4].join(" "), answer);
    assert_eq!(events[4], "[DONE]");
}

#[tokio::test]
async fn streaming_chat_appends_sources_footer() {
    let engine = Arc::new(MockEngine::from_replies(vec![MockReply::answer(
        "short",
        vec!["doc1", "doc2"],
    )]));
    let (app, _) = test_app(engine);

    let (status, body) = send_json(app, "/chat", chat_body("q", true)).await;
    assert_eq!(status, StatusCode::OK);

    let events = sse_payloads(&body);
    assert_eq!(
        events,
        vec!["Thinking...", "short", "Sources: doc1, doc2", "[DONE]"]
    );
}

#[tokio::test]
async fn streaming_engine_failure_stays_in_band() {
    let engine = Arc::new(MockEngine::from_replies(vec![MockReply::error(
        "model timed out",
    )]));
    let (app, _) = test_app(engine);

    let (status, body) = send_json(app, "/chat", chat_body("q", true)).await;

    // The stream was accepted before the engine ran, so the HTTP status is
    // committed and the failure arrives as events.
    assert_eq!(status, StatusCode::OK);
    let events = sse_payloads(&body);
    assert_eq!(
        events,
        vec![
            "Thinking...",
            "I encountered an error: model timed out",
            "[DONE]"
        ]
    );
}

#[tokio::test]
async fn summarize_returns_structured_reply() {
    let engine = Arc::new(MockEngine::from_replies(vec![MockReply::answer(
        "Chapter 1 introduces the narrator.",
        vec!["chapter-1"],
    )]));
    let (app, _) = test_app(engine);

    let (status, body) = send_json(
        app,
        "/summarize",
        json!({ "type": "chapter", "target": "Chapter 1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let reply: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(reply["message"]["role"], "assistant");
    assert_eq!(reply["message"]["content"], "Chapter 1 introduces the narrator.");
    assert_eq!(reply["sources"], json!(["chapter-1"]));
}

#[tokio::test]
async fn summarize_engine_failure_is_a_server_error() {
    let engine = Arc::new(MockEngine::from_replies(vec![MockReply::error(
        "summary failed",
    )]));
    let (app, _) = test_app(engine);

    let (status, body) = send_json(
        app,
        "/summarize",
        json!({ "type": "book", "target": "Moby Dick" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(detail["detail"], "summary failed");
}

#[tokio::test]
async fn clear_memory_resets_engine_state() {
    let engine = Arc::new(MockEngine::from_replies(vec![MockReply::answer(
        "remembered",
        vec![],
    )]));
    let (app, _) = test_app(engine.clone());

    let (status, _) = send_json(app.clone(), "/chat", chat_body("hello", false)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!engine.memory().is_empty().await);

    let request = Request::builder()
        .uri("/clear-memory")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "Memory cleared");
    assert!(engine.memory().is_empty().await);

    // Idempotent: clearing again succeeds with the same reply.
    let request = Request::builder()
        .uri("/clear-memory")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_records_metrics_off_the_response_path() {
    let engine = Arc::new(MockEngine::from_replies(vec![MockReply::answer(
        "ok",
        vec![],
    )]));
    let (app, metrics) = test_app(engine);

    // 40-char query estimates to 10 tokens.
    let query = "q".repeat(40);
    let (status, _) = send_json(app, "/chat", chat_body(&query, false)).await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..100 {
        if metrics.tokens("chat") == 10 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("chat metrics were never recorded");
}
