//! Error types for the workflow engine

use thiserror::Error;

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in the workflow engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// No handler is registered for a node's block type
    #[error("no handler for block type '{0}'")]
    HandlerMissing(String),

    /// A block handler failed
    #[error("block execution failed: {0}")]
    ExecutionFailed(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot compression error
    #[error("snapshot compression error: {0}")]
    Compression(String),
}

impl EngineError {
    /// Create an execution failed error with a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }
}
