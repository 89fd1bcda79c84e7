//! Global constants used throughout the jsonstore codebase
//!
//! Field names of the on-disk format and the user-visible messages live here
//! so the engine, storage and HTTP layers agree on them.

/// Key holding the records of a collection in the backing file
pub const ENTITY_DATA: &str = "_data";

/// Key holding the next identifier of a collection in the backing file
pub const ENTITY_AUTO_INCREMENT: &str = "_auto_increment";

/// Mandatory identifier field of every record
pub const ID: &str = "id";

/// First identifier handed out by a freshly created collection
pub const FIRST_ID: u64 = 1;

/// Ascending sort order token (compared case-insensitively)
pub const ASCENDING: &str = "asc";

/// Descending sort order token (compared case-insensitively)
pub const DESCENDING: &str = "desc";

/// Query parameter naming the sort field
pub const SORT_PARAM: &str = "_sort";

/// Query parameter naming the sort order
pub const ORDER_PARAM: &str = "_order";

/// Default location of the backing file
pub const DEFAULT_STORE_PATH: &str = "./store.json";

/// Default HTTP port, bound on all interfaces
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default route prefix of the store endpoints
pub const DEFAULT_BASE_PATH: &str = "/store";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted by the configuration
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// Messages

/// Rejection for write bodies that carry an `id`
pub const ID_IMMUTABLE_ERROR_MESSAGE: &str = "id cannot be passed in the body, it is immutable.";

/// Unknown collection
pub const ENTITY_TYPE_NOT_FOUND_MESSAGE: &str = "Entity type does not exist";

/// Unknown record on read
pub const ENTITY_BY_ID_NOT_FOUND_MESSAGE: &str = "Failed to get entity by id";

/// Unknown record on write
pub const ENTITY_NOT_FOUND_MESSAGE: &str = "Entity does not exist";

/// Sort order token is neither `asc` nor `desc`
pub const INVALID_SORT_ORDER_MESSAGE: &str = "Invalid value for sort order";

/// Filter names a field some record lacks
pub const FILTER_MISMATCH_MESSAGE: &str = "All passed parameters do not match with entity parameters.";

/// Sort names a field some record lacks
pub const SORT_FIELD_MISSING_MESSAGE: &str = "Sort field is missing on one or more entities.";

/// Update body names a field the record lacks
pub const UNKNOWN_FIELDS_MESSAGE: &str = "Update contains fields that do not exist on the entity.";

/// Reload succeeded
pub const RELOAD_SUCCESS_MESSAGE: &str = "Store reloaded from file.";

/// Reload failed
pub const RELOAD_FAILURE_MESSAGE: &str = "Failed to reload store. Check with admin.";
