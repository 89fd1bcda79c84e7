/// Type definitions for the jsonstore system
///
/// This module contains all type definitions organized by category.

/// Document, collection and record types
pub mod document;
/// System-wide error types
pub mod error;

/// Identifier assigned to every record
pub type RecordId = u64;

// Re-export commonly used types for convenience
pub use document::{record_id, Collection, Document, Record};
pub use error::{Error, ErrorKind, Result, StoreError, StoreResult};
