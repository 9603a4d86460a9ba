use std::sync::Arc;

use crate::engine::AnswerEngine;
use crate::metrics::Metrics;
use crate::streaming::StreamOptions;

/// Application state shared across all API handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn AnswerEngine>,
    pub metrics: Arc<Metrics>,
    pub stream_options: StreamOptions,
}

impl AppState {
    pub fn new(engine: Arc<dyn AnswerEngine>) -> Self {
        Self {
            engine,
            metrics: Arc::new(Metrics::new()),
            stream_options: StreamOptions::default(),
        }
    }

    pub fn with_stream_options(mut self, stream_options: StreamOptions) -> Self {
        self.stream_options = stream_options;
        self
    }
}
