//! Error types for book operations.

use shelf_kernel::Interrupt;
use thiserror::Error;

/// Result type alias for book use cases and the persistence port.
pub type BookResult<T> = std::result::Result<T, BookError>;

/// Errors surfaced to callers of the book use cases.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    /// A required field was missing; nothing was attempted.
    #[error("{0}")]
    Validation(String),

    /// No matching record owned by the caller. Also used for records owned by someone else.
    #[error("book not found")]
    NotFound,

    /// Persistence I/O failure.
    #[error("store error: {0}")]
    Store(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl BookError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }
}

impl From<Interrupt> for BookError {
    fn from(interrupt: Interrupt) -> Self {
        match interrupt {
            Interrupt::Cancelled => BookError::Cancelled,
            Interrupt::DeadlineExceeded => BookError::DeadlineExceeded,
        }
    }
}

/// Failures of the assist collaborator. Always recovered inside the orchestrator.
#[derive(Error, Debug)]
pub enum AssistError {
    #[error("{0} cannot be empty")]
    EmptyInput(&'static str),

    #[error("assist request failed: {0}")]
    Request(String),

    #[error("assist returned an unusable response: {0}")]
    Response(String),

    #[error("assist configuration error: {0}")]
    Config(String),
}
