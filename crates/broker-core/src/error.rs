//! Error types for broker-core operations.

use thiserror::Error;

/// Comprehensive error type for FIFO queue, KV store, message queue, and
/// queue manager operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("queue is empty")]
    QueueEmpty,

    #[error("queue '{0}' no longer exists")]
    QueueGone(String),

    #[error("queue '{0}' not found")]
    QueueNotFound(String),

    #[error("queue '{0}' already exists")]
    AlreadyExists(String),

    #[error("message receipt '{0}' not found or already deleted")]
    MessageNotFound(String),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("internal invariant violated: {0}")]
    Fatal(String),
}

impl Error {
    /// Check if retrying the same operation without a state change could
    /// plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::QueueEmpty => true,
            Self::QueueGone(_) => false,
            Self::QueueNotFound(_) => false,
            Self::AlreadyExists(_) => false,
            Self::MessageNotFound(_) => false,
            Self::Validation(_) => false,
            Self::Fatal(_) => false,
        }
    }

    /// Check if the error should be retried.
    pub fn should_retry(&self) -> bool {
        self.is_transient()
    }
}

/// Validation errors raised by domain newtypes (queue names, ids, ...).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
