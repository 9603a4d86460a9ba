//! Process-wide usage metrics.
//!
//! Token counts use the rough four-characters-per-token estimate, not a real
//! tokenizer. Recording runs off the response path and never fails a
//! request.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::warn;

/// Labeled token counters plus a resident-memory gauge.
///
/// Counters only ever increase; the gauge holds the most recent sample.
#[derive(Debug, Default)]
pub struct Metrics {
    tokens: Mutex<HashMap<String, u64>>,
    memory_bytes: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record usage for one completed (or accepted) operation.
    pub fn record_usage(&self, operation: &str, input_len: usize) {
        let estimated_tokens = (input_len / 4) as u64;

        let mut tokens = self
            .tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *tokens.entry(operation.to_string()).or_insert(0) += estimated_tokens;
        drop(tokens);

        match process_rss_bytes() {
            Ok(rss) => self.memory_bytes.store(rss, Ordering::Relaxed),
            Err(e) => warn!(error = %e, "failed to sample process memory"),
        }
    }

    /// Dispatch a recording off the critical path.
    pub fn record_background(metrics: Arc<Self>, operation: &'static str, input_len: usize) {
        tokio::spawn(async move {
            metrics.record_usage(operation, input_len);
        });
    }

    /// Accumulated estimated tokens for an operation label.
    pub fn tokens(&self, operation: &str) -> u64 {
        self.tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    /// Most recently sampled resident memory, in bytes.
    pub fn memory_bytes(&self) -> u64 {
        self.memory_bytes.load(Ordering::Relaxed)
    }
}

#[cfg(target_os = "linux")]
fn process_rss_bytes() -> std::io::Result<u64> {
    // Second field of /proc/self/statm is resident pages.
    let statm = std::fs::read_to_string("/proc/self/statm")?;
    let resident_pages: u64 = statm
        .split_whitespace()
        .nth(1)
        .and_then(|field| field.parse().ok())
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, "malformed /proc/self/statm")
        })?;

    // 4 KiB pages on all supported targets; the gauge is approximate anyway.
    Ok(resident_pages * 4096)
}

#[cfg(not(target_os = "linux"))]
fn process_rss_bytes() -> std::io::Result<u64> {
    Ok(0)
}
