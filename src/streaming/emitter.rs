//! Timed emission of a completed answer over one ordered stream.
//!
//! The emitter produces plain event payloads; the HTTP layer wraps them in
//! SSE framing. Order within a stream is fixed: acknowledgement, chunks,
//! optional sources footer, terminal marker. The terminal marker is emitted
//! on every path. Once the acknowledgement is out the HTTP status is already
//! committed, so engine failures are expressed as in-band events instead of
//! transport errors.

use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::engine::AnswerEngine;
use crate::streaming::chunker::{DEFAULT_CHUNK_LEN, chunk_text};

/// Terminal sentinel every stream ends with.
pub const DONE_MARKER: &str = "[DONE]";

/// Acknowledgement sent before the answer is computed.
pub const ACK_MESSAGE: &str = "Thinking...";

/// Presentation tuning for a stream.
///
/// The delays pace emission for readability; they are not a correctness
/// parameter and tests run with both set to zero.
#[derive(Debug, Clone, Copy)]
pub struct StreamOptions {
    pub chunk_len: usize,
    pub ack_delay: Duration,
    pub chunk_delay: Duration,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            chunk_len: DEFAULT_CHUNK_LEN,
            ack_delay: Duration::from_millis(200),
            chunk_delay: Duration::from_millis(30),
        }
    }
}

impl StreamOptions {
    /// Zero-delay variant for tests.
    pub fn immediate(mut self) -> Self {
        self.ack_delay = Duration::ZERO;
        self.chunk_delay = Duration::ZERO;
        self
    }
}

/// Drive one chat answer as an ordered stream of event payloads.
///
/// Dropping the stream (client disconnect) abandons the remaining steps.
pub fn chat_stream(
    engine: Arc<dyn AnswerEngine>,
    query: String,
    response_mode: String,
    opts: StreamOptions,
) -> impl Stream<Item = String> {
    async_stream::stream! {
        info!(query = %query, "starting streaming response");

        yield ACK_MESSAGE.to_string();
        sleep(opts.ack_delay).await;

        match engine.generate_response(&query, &response_mode).await {
            Ok(answer) => {
                info!(chars = answer.text.len(), "generated full response");

                let chunks = chunk_text(&answer.text, opts.chunk_len);
                let total = chunks.len();
                for (i, chunk) in chunks.into_iter().enumerate() {
                    debug!(chunk = i + 1, total, "streaming chunk");
                    yield chunk;
                    sleep(opts.chunk_delay).await;
                }

                if !answer.sources.is_empty() {
                    yield format!("Sources: {}", answer.sources.join(", "));
                }

                info!("streaming completed");
            }
            Err(e) => {
                error!(error = %e, "error during streaming");
                yield format!("I encountered an error: {e}");
            }
        }

        yield DONE_MARKER.to_string();
    }
}
