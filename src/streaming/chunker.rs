//! Word-boundary chunking of finished answers.

/// Default accumulated-length bound for streamed chunks.
pub const DEFAULT_CHUNK_LEN: usize = 30;

/// Split `text` into word-boundary chunks of roughly `max_len` characters.
///
/// The bound is advisory: a word longer than `max_len` is emitted whole,
/// never split. Joining the chunks with single spaces reproduces the input
/// with internal whitespace collapsed. Empty or whitespace-only input
/// produces no chunks.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buf = String::new();

    for word in text.split_whitespace() {
        // +1 accounts for the separating space.
        if !buf.is_empty() && buf.len() + word.len() + 1 > max_len {
            chunks.push(buf.trim_end().to_string());
            buf.clear();
        }
        buf.push_str(word);
        buf.push(' ');
    }

    if !buf.trim_end().is_empty() {
        chunks.push(buf.trim_end().to_string());
    }

    chunks
}
