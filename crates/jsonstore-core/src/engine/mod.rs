//! Query/Mutation engine
//!
//! Pure functions over a [`Document`](crate::types::Document). They take no
//! locks and do no I/O; [`Store`](crate::storage::Store) wraps them with the
//! reader/writer gate and persistence.
//!
//! Every operation fails with `NotFound` when the named collection is absent,
//! except [`create`], which creates it. Filtering and sorting compare the
//! string form of field values, never their numeric value.

/// Read-only operations: list, filter, sort, lookup
pub mod query;

/// Write operations: create, replace, update, delete
pub mod mutation;

pub use mutation::{create, create_or_replace, delete, update};
pub use query::{get_by_id, list, list_filtered, list_sorted, value_text, SortOrder};
