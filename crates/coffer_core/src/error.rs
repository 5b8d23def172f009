//! Error types for the typed persistence layer.

use thiserror::Error;

/// Result type for typed persistence operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the typed persistence layer.
///
/// Absent records and undecodable payloads are **not** errors anywhere in
/// the API - they surface as empty results. The variants here cover the
/// failures that must reach the caller: the engine could not complete a
/// transaction, a value could not be encoded for storage, or the background
/// task carrying an async operation died before delivering its result.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Store engine failure.
    #[error("store error: {0}")]
    Store(#[from] coffer_store::StoreError),

    /// A value could not be encoded for storage.
    #[error("codec error: {message}")]
    Codec {
        /// Description of the encoding failure.
        message: String,
    },

    /// The background task running an async operation died before
    /// delivering its result.
    #[error("background task failed: {message}")]
    Background {
        /// Description of the task failure.
        message: String,
    },
}

impl CoreError {
    /// Creates a codec error.
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Creates a background task error.
    pub fn background(message: impl Into<String>) -> Self {
        Self::Background {
            message: message.into(),
        }
    }
}
