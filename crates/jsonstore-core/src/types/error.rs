//! Error types and handling for jsonstore
//!
//! `StoreError` is what the engine and the storage backends return; it carries
//! a message and classifies into an [`ErrorKind`] that the HTTP layer maps to a
//! status code. `Error` wraps it for bootstrap paths (config, factory, server).

use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Result type of store and engine operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Classification of a failed store operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client sent something inconsistent with the stored data
    BadRequest,
    /// The referenced collection or record does not exist
    NotFound,
    /// File access, parsing or any other unexpected fault
    InternalFailure,
}

/// Main error type for jsonstore
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store operation errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `id` in a write body, unknown sort order, or parameters that do not
    /// fit the record shape
    #[error("{0}")]
    BadRequest(String),

    /// Collection or record does not exist
    #[error("{0}")]
    NotFound(String),

    /// The backing document could not be read, parsed or validated
    #[error("Failed to load store: {0}")]
    LoadFailure(String),

    /// The backing document could not be written
    #[error("Failed to persist store: {0}")]
    PersistFailure(String),

    /// Any other unexpected fault
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl StoreError {
    /// Create a bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a load failure
    pub fn load_failure(msg: impl Into<String>) -> Self {
        Self::LoadFailure(msg.into())
    }

    /// Create a persist failure
    pub fn persist_failure(msg: impl Into<String>) -> Self {
        Self::PersistFailure(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Classification used by the HTTP layer
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::BadRequest(_) => ErrorKind::BadRequest,
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::LoadFailure(_)
            | StoreError::PersistFailure(_)
            | StoreError::Internal(_) => ErrorKind::InternalFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(StoreError::bad_request("x").kind(), ErrorKind::BadRequest);
        assert_eq!(StoreError::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(StoreError::load_failure("x").kind(), ErrorKind::InternalFailure);
        assert_eq!(StoreError::persist_failure("x").kind(), ErrorKind::InternalFailure);
        assert_eq!(StoreError::internal("x").kind(), ErrorKind::InternalFailure);
    }

    #[test]
    fn client_messages_are_passed_through() {
        assert_eq!(StoreError::bad_request("no good").to_string(), "no good");
        assert_eq!(
            StoreError::persist_failure("disk full").to_string(),
            "Failed to persist store: disk full"
        );
    }

    #[test]
    fn store_error_converts_into_error() {
        let err: Error = StoreError::not_found("gone").into();
        assert!(matches!(err, Error::Store(StoreError::NotFound(_))));
    }
}
