//! HTTP request handlers for the jsonstore API
//!
//! Handlers translate paths, query strings and bodies into store calls and
//! map the outcome onto a status code plus either the entity payload or the
//! `{"message", "success"}` envelope.

use axum::{
    extract::{
        rejection::JsonRejection, FromRequest, FromRequestParts, Path, Query, Request, State,
    },
    http::{request::Parts, StatusCode, Uri},
    response::Json,
    Json as JsonExtractor,
};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};

use jsonstore_core::{
    constants::{ORDER_PARAM, RELOAD_FAILURE_MESSAGE, RELOAD_SUCCESS_MESSAGE, SORT_PARAM},
    core::AppState,
    log_debug, log_error, log_info, log_warn,
    storage::StorageImpl,
    ErrorKind, Record, RecordId, SortOrder, StoreError, VERSION,
};

use crate::constants::{
    BODY_NOT_OBJECT_MESSAGE, CREATE_FAILURE_MESSAGE, DELETE_FAILURE_MESSAGE, GET_FAILURE_MESSAGE,
    INVALID_QUERY_MESSAGE, LIST_FAILURE_MESSAGE, REPLACE_FAILURE_MESSAGE, SERVICE_NAME,
    SORT_FAILURE_MESSAGE, UPDATE_FAILURE_MESSAGE,
};

// Response types

/// Message envelope used for every failure and for reload
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    /// Human readable outcome
    pub message: String,
    /// Whether the operation was successful
    pub success: bool,
}

impl ApiMessage {
    /// Successful outcome with a message
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// Failed outcome with a message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

/// Status code plus failure envelope
pub type ApiError = (StatusCode, Json<ApiMessage>);

/// System health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current system status
    pub status: String,
    /// Seconds since the server state was created
    pub uptime: String,
    /// Server version
    pub version: String,
}

/// System information response
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Service name
    pub name: String,
    /// Server version
    pub version: String,
    /// Number of collections held
    pub collections: usize,
    /// Storage backend in use
    pub storage_type: String,
}

fn failure(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiMessage::failure(message)))
}

/// Map a store error to a response. Internal failures hide the detail
/// behind `failure_message` and log it instead.
fn store_error(err: StoreError, failure_message: &str) -> ApiError {
    match err.kind() {
        ErrorKind::BadRequest => {
            log_debug!("Rejected request: {}", err);
            failure(StatusCode::BAD_REQUEST, err.to_string())
        }
        ErrorKind::NotFound => failure(StatusCode::NOT_FOUND, err.to_string()),
        ErrorKind::InternalFailure => {
            log_error!("{} ({})", failure_message, err);
            failure(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
        }
    }
}

fn path_not_found(uri: &Uri) -> ApiError {
    failure(
        StatusCode::NOT_FOUND,
        format!("Path: {} not found", uri.path()),
    )
}

/// Record ids in paths are plain digit runs; anything else is not a route.
fn parse_id(raw: &str) -> Option<RecordId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Custom JSON extractor that returns proper JSON error responses
pub struct JsonRequest<T>(pub T);

impl<T, S> FromRequest<S> for JsonRequest<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match JsonExtractor::<T>::from_request(req, state).await {
            Ok(JsonExtractor(value)) => Ok(JsonRequest(value)),
            Err(rejection) => {
                let error_message = match rejection {
                    JsonRejection::JsonDataError(_) => BODY_NOT_OBJECT_MESSAGE.to_string(),
                    JsonRejection::JsonSyntaxError(_) => "Malformed JSON".to_string(),
                    JsonRejection::MissingJsonContentType(_) => {
                        "Missing or invalid Content-Type header. Expected 'application/json'"
                            .to_string()
                    }
                    JsonRejection::BytesRejection(_) => "Failed to read request body".to_string(),
                    _ => "Invalid JSON request".to_string(),
                };

                log_warn!("JSON parsing error: {}", error_message);
                Err(failure(StatusCode::BAD_REQUEST, error_message))
            }
        }
    }
}

/// Path extractor that treats an undecodable path as an unmatched route
pub struct PathRequest<T>(pub T);

impl<T, S> FromRequestParts<S> for PathRequest<T>
where
    T: serde::de::DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathRequest(value)),
            Err(rejection) => {
                log_debug!("Unusable path {}: {}", parts.uri.path(), rejection);
                Err(path_not_found(&parts.uri))
            }
        }
    }
}

/// Query extractor that answers with the failure envelope
pub struct QueryRequest<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryRequest<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(QueryRequest(value)),
            Err(rejection) => {
                log_warn!("Query parsing error: {}", rejection);
                Err(failure(StatusCode::BAD_REQUEST, INVALID_QUERY_MESSAGE))
            }
        }
    }
}

// Store handlers

/// Reload the document from its backend
pub async fn reload<S: StorageImpl>(
    State(app_state): State<Arc<AppState<S>>>,
) -> Result<Json<ApiMessage>, ApiError> {
    match app_state.store.reload() {
        Ok(()) => {
            log_info!("Store reloaded on request");
            Ok(Json(ApiMessage::success(RELOAD_SUCCESS_MESSAGE)))
        }
        Err(e) => {
            log_error!("Reload failed: {}", e);
            Err(failure(StatusCode::INTERNAL_SERVER_ERROR, RELOAD_FAILURE_MESSAGE))
        }
    }
}

/// List a collection: sorted when both `_sort` and `_order` are given,
/// filtered when any other query is present, otherwise in full
pub async fn list_entities<S: StorageImpl>(
    State(app_state): State<Arc<AppState<S>>>,
    PathRequest(collection): PathRequest<String>,
    QueryRequest(params): QueryRequest<HashMap<String, String>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    if let (Some(field), Some(order)) = (params.get(SORT_PARAM), params.get(ORDER_PARAM)) {
        let order: SortOrder = order
            .parse()
            .map_err(|e| store_error(e, SORT_FAILURE_MESSAGE))?;
        return app_state
            .store
            .list_sorted(&collection, field, order)
            .map(Json)
            .map_err(|e| store_error(e, SORT_FAILURE_MESSAGE));
    }

    let records = if params.is_empty() {
        app_state.store.list(&collection)
    } else {
        app_state.store.list_filtered(&collection, &params)
    };
    records
        .map(Json)
        .map_err(|e| store_error(e, LIST_FAILURE_MESSAGE))
}

/// Fetch one record
pub async fn get_entity<S: StorageImpl>(
    State(app_state): State<Arc<AppState<S>>>,
    PathRequest((collection, id)): PathRequest<(String, String)>,
    uri: Uri,
) -> Result<Json<Record>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| path_not_found(&uri))?;
    app_state
        .store
        .get_by_id(&collection, id)
        .map(Json)
        .map_err(|e| store_error(e, GET_FAILURE_MESSAGE))
}

/// Append a record with the next id
pub async fn create_entity<S: StorageImpl>(
    State(app_state): State<Arc<AppState<S>>>,
    PathRequest(collection): PathRequest<String>,
    JsonRequest(body): JsonRequest<Record>,
) -> Result<Json<Record>, ApiError> {
    let record = app_state
        .store
        .create(&collection, body)
        .map_err(|e| store_error(e, CREATE_FAILURE_MESSAGE))?;
    log_info!("Created entity in {}", collection);
    Ok(Json(record))
}

/// Replace a record wholesale, or add it under the given id
pub async fn replace_entity<S: StorageImpl>(
    State(app_state): State<Arc<AppState<S>>>,
    PathRequest((collection, id)): PathRequest<(String, String)>,
    uri: Uri,
    JsonRequest(body): JsonRequest<Record>,
) -> Result<Json<Record>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| path_not_found(&uri))?;
    app_state
        .store
        .create_or_replace(&collection, id, body)
        .map(Json)
        .map_err(|e| store_error(e, REPLACE_FAILURE_MESSAGE))
}

/// Overwrite existing fields of a record
pub async fn update_entity<S: StorageImpl>(
    State(app_state): State<Arc<AppState<S>>>,
    PathRequest((collection, id)): PathRequest<(String, String)>,
    uri: Uri,
    JsonRequest(body): JsonRequest<Record>,
) -> Result<Json<Record>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| path_not_found(&uri))?;
    app_state
        .store
        .update(&collection, id, body)
        .map(Json)
        .map_err(|e| store_error(e, UPDATE_FAILURE_MESSAGE))
}

/// Remove a record and return it
pub async fn delete_entity<S: StorageImpl>(
    State(app_state): State<Arc<AppState<S>>>,
    PathRequest((collection, id)): PathRequest<(String, String)>,
    uri: Uri,
) -> Result<Json<Record>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| path_not_found(&uri))?;
    let record = app_state
        .store
        .delete(&collection, id)
        .map_err(|e| store_error(e, DELETE_FAILURE_MESSAGE))?;
    log_info!("Deleted entity {} from {}", id, collection);
    Ok(Json(record))
}

/// Catch-all for unmatched paths and methods
pub async fn not_found(uri: Uri) -> ApiError {
    log_debug!("No route for {}", uri.path());
    path_not_found(&uri)
}

// System handlers

/// Health check endpoint
pub async fn health_check<S: StorageImpl>(
    State(app_state): State<Arc<AppState<S>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime: format!("{}s", app_state.uptime().as_secs()),
        version: VERSION.to_string(),
    })
}

/// System information endpoint
pub async fn system_info<S: StorageImpl>(
    State(app_state): State<Arc<AppState<S>>>,
) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: SERVICE_NAME.to_string(),
        version: VERSION.to_string(),
        collections: app_state.store.collection_count(),
        storage_type: app_state.config.storage.storage_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_plain_digits() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("007"), Some(7));
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("+1"), None);
        assert_eq!(parse_id("1a"), None);
        assert_eq!(parse_id("99999999999999999999999"), None);
    }

    #[test]
    fn internal_errors_hide_detail() {
        let (status, Json(body)) =
            store_error(StoreError::persist_failure("disk gone"), CREATE_FAILURE_MESSAGE);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, CREATE_FAILURE_MESSAGE);
        assert!(!body.success);
    }

    #[test]
    fn client_errors_carry_their_message() {
        let (status, Json(body)) = store_error(StoreError::not_found("gone"), GET_FAILURE_MESSAGE);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "gone");

        let (status, _) = store_error(StoreError::bad_request("no"), GET_FAILURE_MESSAGE);
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
