//! Error types for store engine operations.

use std::io;
use thiserror::Error;

/// Result type for store engine operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in a store engine.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stored data is corrupted.
    #[error("store corrupted: {0}")]
    Corrupted(String),

    /// The engine has been closed.
    #[error("store engine is closed")]
    Closed,
}
