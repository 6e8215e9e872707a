//! Errors raised while encoding or decoding wire frames.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("buffer too short: expected {expected} bytes, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("string field '{field}' is not valid UTF-32BE")]
    InvalidUtf32 { field: String },

    #[error("unknown command code {0}")]
    UnknownCommand(u8),

    #[error("unknown response result code {0}")]
    UnknownResult(u8),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
