//! Error types for the storage layer
//!
//! Following the miette patterns used throughout Tessera for consistent error reporting.

use miette::Diagnostic;
use thiserror::Error;

/// Result alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Failures raised by the storage layer itself
///
/// Computations wrapped by a lazy value or memoized function use their own error
/// type; that type must be constructible from `StorageError` so the storage layer
/// can report cancellation and recursion through it.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Computation cancelled")]
    #[diagnostic(
        code(tessera::storage::cancelled),
        help("The session was cancelled. The value stays uncomputed and is retried on the next request.")
    )]
    Cancelled,

    #[error("Recursion detected while computing {key}")]
    #[diagnostic(
        code(tessera::storage::recursion),
        help("A lazy computation requested its own result on the same thread")
    )]
    RecursionDetected { key: String },
}

impl StorageError {
    /// Whether this error came from a cancellation request
    pub fn is_cancellation(&self) -> bool {
        matches!(self, StorageError::Cancelled)
    }
}
