//! Storage-boundary error shared by every repository trait.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a storage backend.
///
/// The HTTP boundary maps every variant to a generic 500; the detail is for logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not serve the request (lock poisoned, connection lost...).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness constraint was violated by a write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// An update targeted a record that does not exist.
    #[error("record not found: {0}")]
    Missing(String),
}
