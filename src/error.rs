//! Error types for the HTTP surface

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::engine::EngineError;

/// Errors surfaced to clients before any response bytes are committed.
///
/// Once a stream has started, failures are expressed as in-band events
/// instead (see [`crate::streaming::emitter`]).
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request failed validation. Maps to 400.
    #[error("{0}")]
    InvalidRequest(String),

    /// The answer engine failed. Maps to 500.
    #[error("{0}")]
    Engine(#[from] EngineError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_maps_to_400() {
        let error = ApiError::InvalidRequest("No messages provided".to_string());
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "No messages provided");
    }

    #[test]
    fn engine_error_maps_to_500() {
        let error = ApiError::from(EngineError::Generation("model unavailable".to_string()));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.to_string(), "model unavailable");
    }
}
