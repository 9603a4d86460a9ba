//! Development engine that answers without a retrieval backend.
//!
//! Keeps the server runnable end-to-end locally: it records conversation
//! turns like a real engine and produces a deterministic answer with no
//! sources. Swap in a real [`AnswerEngine`] implementation for production.

use async_trait::async_trait;

use super::{Answer, AnswerEngine, ConversationMemory, Result};
use crate::models::Message;

#[derive(Debug, Default)]
pub struct EchoEngine {
    memory: ConversationMemory,
}

impl EchoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }
}

#[async_trait]
impl AnswerEngine for EchoEngine {
    async fn generate_response(&self, query: &str, _response_mode: &str) -> Result<Answer> {
        let history = self.memory.snapshot().await;
        let text = if history.is_empty() {
            format!("You asked: {query}")
        } else {
            format!("You asked: {query} ({} earlier turns)", history.len())
        };

        self.memory.push(Message::user(query)).await;
        self.memory.push(Message::assistant(&text)).await;

        Ok(Answer::new(text, Vec::new()))
    }

    async fn generate_summary(
        &self,
        summary_type: &str,
        target: &str,
        _response_mode: &str,
    ) -> Result<Answer> {
        Ok(Answer::new(
            format!("No retrieval backend is configured, so the {summary_type} '{target}' cannot be summarized."),
            Vec::new(),
        ))
    }

    async fn clear_memory(&self) {
        self.memory.clear().await;
    }
}
