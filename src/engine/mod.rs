//! Answer engine abstraction
//!
//! Answer generation is an external collaborator behind the [`AnswerEngine`]
//! trait. The service only depends on the trait: handlers and the stream
//! emitter receive an `Arc<dyn AnswerEngine>` and never see how text is
//! produced.

mod echo;
pub mod mock;

pub use echo::EchoEngine;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::Message;

/// Answer engine error types
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Generation(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// A finished answer with its supporting source identifiers.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<String>,
}

impl Answer {
    pub fn new(text: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            text: text.into(),
            sources,
        }
    }
}

/// External collaborator that turns queries into finished answers.
#[async_trait]
pub trait AnswerEngine: Send + Sync {
    /// Generate an answer for a user query.
    async fn generate_response(&self, query: &str, response_mode: &str) -> Result<Answer>;

    /// Generate a summary for a named target.
    async fn generate_summary(
        &self,
        summary_type: &str,
        target: &str,
        response_mode: &str,
    ) -> Result<Answer>;

    /// Reset accumulated conversation state. Idempotent.
    async fn clear_memory(&self);
}

/// Conversation history shared by all in-flight requests of one engine.
///
/// Generation takes a snapshot under the read lock at call start, so a
/// concurrent [`clear`](ConversationMemory::clear) affects later generations
/// only, never one already holding a snapshot.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    turns: RwLock<Vec<Message>>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Vec<Message> {
        self.turns.read().await.clone()
    }

    pub async fn push(&self, message: Message) {
        self.turns.write().await.push(message);
    }

    pub async fn len(&self) -> usize {
        self.turns.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.turns.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.turns.write().await.clear();
    }
}
