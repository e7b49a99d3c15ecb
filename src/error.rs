//! Error types for the memoization engine
//!
//! Provides unified error handling using thiserror. Failures of memoized
//! callables are never wrapped here; they reach the caller unchanged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Memoize Error Enum ==
/// Unified error type for the memoization engine.
#[derive(Error, Debug)]
pub enum MemoizeError {
    /// Invalid memoizer setup, raised when the wrapper is built
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Deferred invocation attempted outside a tokio runtime
    #[error("Deferred invocation requires a running tokio runtime")]
    NoRuntime,

    /// Requested segment does not exist (diagnostics only)
    #[error("Segment not found: {0}")]
    SegmentNotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for MemoizeError {
    fn into_response(self) -> Response {
        let status = match &self {
            MemoizeError::Configuration(_) => StatusCode::BAD_REQUEST,
            MemoizeError::SegmentNotFound(_) => StatusCode::NOT_FOUND,
            MemoizeError::NoRuntime => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the memoization engine.
pub type Result<T> = std::result::Result<T, MemoizeError>;
