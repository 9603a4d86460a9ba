//! Deterministic scripted engine for reliability tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use super::{Answer, AnswerEngine, ConversationMemory, EngineError, Result};
use crate::models::Message;

/// Scripted outcome for one engine call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return a finished answer.
    Answer { text: String, sources: Vec<String> },
    /// Fail with an engine error.
    Error(String),
}

impl MockReply {
    pub fn answer(text: impl Into<String>, sources: Vec<&str>) -> Self {
        Self::Answer {
            text: text.into(),
            sources: sources.into_iter().map(String::from).collect(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}

/// An answer engine driven by a scripted reply queue.
#[derive(Debug, Default)]
pub struct MockEngine {
    script: Mutex<VecDeque<MockReply>>,
    memory: ConversationMemory,
    delay: Duration,
}

impl MockEngine {
    pub fn from_replies(replies: Vec<MockReply>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            memory: ConversationMemory::new(),
            delay: Duration::ZERO,
        }
    }

    /// Delay applied before every reply, to simulate generation latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    fn next_reply(&self) -> Result<Answer> {
        let reply = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        match reply {
            Some(MockReply::Answer { text, sources }) => Ok(Answer { text, sources }),
            Some(MockReply::Error(message)) => Err(EngineError::Generation(message)),
            None => Err(EngineError::Generation("mock script exhausted".to_string())),
        }
    }
}

#[async_trait]
impl AnswerEngine for MockEngine {
    async fn generate_response(&self, query: &str, _response_mode: &str) -> Result<Answer> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.memory.push(Message::user(query)).await;
        let answer = self.next_reply()?;
        self.memory.push(Message::assistant(&answer.text)).await;
        Ok(answer)
    }

    async fn generate_summary(
        &self,
        _summary_type: &str,
        _target: &str,
        _response_mode: &str,
    ) -> Result<Answer> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.next_reply()
    }

    async fn clear_memory(&self) {
        self.memory.clear().await;
    }
}
