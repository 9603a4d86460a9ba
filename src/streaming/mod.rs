//! Streaming delivery pipeline: chunking and timed emission.

pub mod chunker;
pub mod emitter;

pub use chunker::{DEFAULT_CHUNK_LEN, chunk_text};
pub use emitter::{ACK_MESSAGE, DONE_MARKER, StreamOptions, chat_stream};
