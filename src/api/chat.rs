//! Chat, summarization and maintenance handlers.

use std::convert::Infallible;
use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::response::sse::Event;
use axum::response::{IntoResponse, Response, Sse};
use futures::StreamExt;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::api::state::AppState;
use crate::error::ApiError;
use crate::metrics::Metrics;
use crate::models::{
    ChatRequest, ChatResponse, HealthResponse, Message, Role, SummarizationRequest,
};
use crate::streaming::chat_stream;

// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let started = Instant::now();

    let last = request
        .messages
        .last()
        .ok_or_else(|| ApiError::InvalidRequest("No messages provided".to_string()))?;
    if last.role != Role::User {
        return Err(ApiError::InvalidRequest(
            "Last message must be from user".to_string(),
        ));
    }
    let query = last.content.clone();

    if request.stream {
        // Recorded on acceptance; the stream itself must not wait on it.
        Metrics::record_background(state.metrics.clone(), "chat", query.len());

        let events = chat_stream(
            state.engine.clone(),
            query,
            request.response_mode,
            state.stream_options,
        )
        .map(|payload| Ok::<_, Infallible>(Event::default().data(payload)));

        return Ok(Sse::new(events).into_response());
    }

    let answer = state
        .engine
        .generate_response(&query, &request.response_mode)
        .await
        .map_err(|e| {
            error!(error = %e, "error generating response");
            e
        })?;

    Metrics::record_background(state.metrics.clone(), "chat", query.len());

    info!(
        elapsed_s = format!("{:.2}", started.elapsed().as_secs_f64()),
        "response generated"
    );

    Ok(Json(ChatResponse {
        message: Message::assistant(answer.text),
        sources: answer.sources,
    })
    .into_response())
}

// POST /summarize
pub async fn summarize(
    State(state): State<AppState>,
    Json(request): Json<SummarizationRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let started = Instant::now();

    let answer = state
        .engine
        .generate_summary(
            &request.summary_type,
            &request.target,
            &request.response_mode,
        )
        .await
        .map_err(|e| {
            error!(error = %e, "error generating summary");
            e
        })?;

    Metrics::record_background(state.metrics.clone(), "summarize", request.target.len());

    info!(
        elapsed_s = format!("{:.2}", started.elapsed().as_secs_f64()),
        "summary generated"
    );

    Ok(Json(ChatResponse {
        message: Message::assistant(answer.text),
        sources: answer.sources,
    }))
}

// GET /clear-memory
pub async fn clear_memory(State(state): State<AppState>) -> Json<Value> {
    state.engine.clear_memory().await;
    info!("conversation memory cleared");
    Json(json!({ "status": "Memory cleared" }))
}
