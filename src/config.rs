//! Runtime configuration, environment-driven with defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::streaming::StreamOptions;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub chunk_len: usize,
    pub ack_delay: Duration,
    pub chunk_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let stream = StreamOptions::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            chunk_len: stream.chunk_len,
            ack_delay: stream.ack_delay,
            chunk_delay: stream.chunk_delay,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("RAGLINE_HOST").unwrap_or(defaults.host),
            port: parse_var("RAGLINE_PORT").unwrap_or(defaults.port),
            chunk_len: parse_var("RAGLINE_CHUNK_LEN").unwrap_or(defaults.chunk_len),
            ack_delay: parse_var("RAGLINE_ACK_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.ack_delay),
            chunk_delay: parse_var("RAGLINE_CHUNK_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.chunk_delay),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn stream_options(&self) -> StreamOptions {
        StreamOptions {
            chunk_len: self.chunk_len,
            ack_delay: self.ack_delay,
            chunk_delay: self.chunk_delay,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}
