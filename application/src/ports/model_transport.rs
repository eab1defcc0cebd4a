//! Model transport port
//!
//! Defines the single request/response round trip the agents depend on.
//! Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while invoking a model
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to start model process: {0}")]
    Spawn(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model process exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("Model call timed out after {0}s")]
    Timeout(u64),

    #[error("Model returned empty output")]
    EmptyOutput,

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

impl TransportError {
    /// Check if this error represents a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

/// Transport for model communication
///
/// One blocking request/response per call. Retries are the caller's
/// concern; a call regenerates text only and never mutates external state.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// Send `prompt` to `model_id` and return the raw response text
    async fn invoke(&self, prompt: &str, model_id: &str) -> Result<String, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = TransportError::NonZeroExit {
            code: Some(2),
            stderr: "bad flag".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Model process exited with status Some(2): bad flag"
        );
        assert!(TransportError::Timeout(30).is_timeout());
        assert!(!TransportError::EmptyOutput.is_timeout());
    }
}
