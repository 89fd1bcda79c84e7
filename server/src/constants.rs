// Constants for the server

/// Service name reported by `/info`
pub const SERVICE_NAME: &str = "jsonstore";

/// Reply when a list/filter lookup fails internally
pub const LIST_FAILURE_MESSAGE: &str = "Failed to get entity. Check with admin.";

/// Reply when a sorted lookup fails internally
pub const SORT_FAILURE_MESSAGE: &str = "Failed to get sorted entity. Check with admin.";

/// Reply when a lookup by id fails internally
pub const GET_FAILURE_MESSAGE: &str = "Failed to get entity by id. Check with admin.";

/// Reply when a create fails internally
pub const CREATE_FAILURE_MESSAGE: &str = "Failed to create entity. Check with admin.";

/// Reply when a replace fails internally
pub const REPLACE_FAILURE_MESSAGE: &str = "Failed to create or update entity. Check with admin.";

/// Reply when an update fails internally
pub const UPDATE_FAILURE_MESSAGE: &str = "Failed to update entity. Check with admin.";

/// Reply when a delete fails internally
pub const DELETE_FAILURE_MESSAGE: &str = "Failed to delete entity. Check with admin.";

/// Body rejected because it is not a JSON object
pub const BODY_NOT_OBJECT_MESSAGE: &str = "Request body must be a JSON object";

/// Query string could not be decoded
pub const INVALID_QUERY_MESSAGE: &str = "Invalid query string";
