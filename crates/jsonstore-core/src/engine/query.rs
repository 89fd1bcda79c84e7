//! Read-only operations over a document

use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;

use serde_json::Value;

use crate::constants::{
    ASCENDING, DESCENDING, ENTITY_BY_ID_NOT_FOUND_MESSAGE, ENTITY_TYPE_NOT_FOUND_MESSAGE,
    FILTER_MISMATCH_MESSAGE, INVALID_SORT_ORDER_MESSAGE, SORT_FIELD_MISSING_MESSAGE,
};
use crate::types::{Collection, Document, Record, RecordId, StoreError, StoreResult};

/// Direction of a sorted listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest string first
    Ascending,
    /// Largest string first
    Descending,
}

impl FromStr for SortOrder {
    type Err = StoreError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.eq_ignore_ascii_case(ASCENDING) {
            Ok(SortOrder::Ascending)
        } else if token.eq_ignore_ascii_case(DESCENDING) {
            Ok(SortOrder::Descending)
        } else {
            Err(StoreError::bad_request(INVALID_SORT_ORDER_MESSAGE))
        }
    }
}

/// String form of a JSON value used for filtering and sorting.
///
/// Strings compare by their contents; every other value by its compact JSON
/// text (`42`, `true`, `null`, `[1,2]`).
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

pub(crate) fn require_collection<'a>(
    document: &'a Document,
    collection: &str,
) -> StoreResult<&'a Collection> {
    document
        .collection(collection)
        .ok_or_else(|| StoreError::not_found(ENTITY_TYPE_NOT_FOUND_MESSAGE))
}

/// All records of a collection in stored order
pub fn list<'a>(document: &'a Document, collection: &str) -> StoreResult<&'a [Record]> {
    Ok(&require_collection(document, collection)?.records)
}

/// Records whose fields equal every expected value in `params`.
///
/// Fails with `BadRequest` as soon as any record lacks one of the requested
/// fields, even when other records would have matched.
pub fn list_filtered<'a>(
    document: &'a Document,
    collection: &str,
    params: &HashMap<String, String>,
) -> StoreResult<Vec<&'a Record>> {
    let records = list(document, collection)?;
    let mut matched = Vec::new();
    for record in records {
        if !params.keys().all(|key| record.contains_key(key)) {
            return Err(StoreError::bad_request(FILTER_MISMATCH_MESSAGE));
        }
        let all_match = params
            .iter()
            .all(|(key, expected)| value_text(&record[key.as_str()]) == expected.as_str());
        if all_match {
            matched.push(record);
        }
    }
    Ok(matched)
}

/// Records stably sorted by the string form of `field`.
///
/// Records with equal values keep their stored relative order in both
/// directions. Every record must carry `field`.
pub fn list_sorted<'a>(
    document: &'a Document,
    collection: &str,
    field: &str,
    order: SortOrder,
) -> StoreResult<Vec<&'a Record>> {
    let records = list(document, collection)?;
    let mut keyed = records
        .iter()
        .map(|record| {
            record
                .get(field)
                .map(|value| (value_text(value), record))
                .ok_or_else(|| StoreError::bad_request(SORT_FIELD_MISSING_MESSAGE))
        })
        .collect::<StoreResult<Vec<_>>>()?;

    // slice::sort_by is stable
    match order {
        SortOrder::Ascending => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortOrder::Descending => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }
    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

/// First record with the given id
pub fn get_by_id<'a>(
    document: &'a Document,
    collection: &str,
    id: RecordId,
) -> StoreResult<&'a Record> {
    require_collection(document, collection)?
        .get(id)
        .ok_or_else(|| StoreError::not_found(ENTITY_BY_ID_NOT_FOUND_MESSAGE))
}
