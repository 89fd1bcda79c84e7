//! Write operations over a document
//!
//! All validation happens before the document is touched, so a failed
//! operation leaves it as it was. None of these persist; that is the store's
//! job.

use serde_json::Value;

use crate::constants::{
    ENTITY_BY_ID_NOT_FOUND_MESSAGE, ENTITY_NOT_FOUND_MESSAGE, ENTITY_TYPE_NOT_FOUND_MESSAGE, ID,
    ID_IMMUTABLE_ERROR_MESSAGE, UNKNOWN_FIELDS_MESSAGE,
};
use crate::types::{Collection, Document, Record, RecordId, StoreError, StoreResult};

fn ensure_no_id(body: &Record) -> StoreResult<()> {
    if body.contains_key(ID) {
        return Err(StoreError::bad_request(ID_IMMUTABLE_ERROR_MESSAGE));
    }
    Ok(())
}

fn require_collection_mut<'a>(
    document: &'a mut Document,
    collection: &str,
) -> StoreResult<&'a mut Collection> {
    document
        .collection_mut(collection)
        .ok_or_else(|| StoreError::not_found(ENTITY_TYPE_NOT_FOUND_MESSAGE))
}

fn id_after(id: RecordId) -> StoreResult<RecordId> {
    id.checked_add(1)
        .ok_or_else(|| StoreError::bad_request(format!("id {} is out of range", id)))
}

/// `id` first, then the body fields in body order
fn build_record(id: RecordId, body: Record) -> Record {
    let mut record = Record::with_capacity(body.len() + 1);
    record.insert(ID.to_string(), Value::from(id));
    record.extend(body);
    record
}

/// Append a new record with the collection's next id.
///
/// Creates the collection when it does not exist yet.
pub fn create(document: &mut Document, collection: &str, body: Record) -> StoreResult<Record> {
    ensure_no_id(&body)?;
    let target = document.collection_or_create(collection);
    let id = target.next_id;
    let next_id = id_after(id)?;
    let record = build_record(id, body);
    target.records.push(record.clone());
    target.next_id = next_id;
    Ok(record)
}

/// Replace the record with `id` wholesale, or append it when absent.
///
/// Appending raises the auto increment past `id` but never lowers it.
pub fn create_or_replace(
    document: &mut Document,
    collection: &str,
    id: RecordId,
    body: Record,
) -> StoreResult<Record> {
    ensure_no_id(&body)?;
    let target = require_collection_mut(document, collection)?;
    let record = build_record(id, body);
    match target.position(id) {
        Some(index) => target.records[index] = record.clone(),
        None => {
            let next_id = id_after(id)?;
            target.records.push(record.clone());
            target.next_id = target.next_id.max(next_id);
        }
    }
    Ok(record)
}

/// Overwrite fields of an existing record in place.
///
/// The body may only name fields the record already has.
pub fn update(
    document: &mut Document,
    collection: &str,
    id: RecordId,
    body: Record,
) -> StoreResult<Record> {
    ensure_no_id(&body)?;
    let target = require_collection_mut(document, collection)?;
    let index = target
        .position(id)
        .ok_or_else(|| StoreError::not_found(ENTITY_BY_ID_NOT_FOUND_MESSAGE))?;
    let record = &mut target.records[index];
    if let Some(unknown) = body.keys().find(|key| !record.contains_key(key.as_str())) {
        return Err(StoreError::bad_request(format!(
            "{} Unknown field: {}",
            UNKNOWN_FIELDS_MESSAGE, unknown
        )));
    }
    for (key, value) in body {
        record.insert(key, value);
    }
    Ok(record.clone())
}

/// Remove and return the record with `id`
pub fn delete(document: &mut Document, collection: &str, id: RecordId) -> StoreResult<Record> {
    let target = require_collection_mut(document, collection)?;
    let index = target
        .position(id)
        .ok_or_else(|| StoreError::not_found(ENTITY_NOT_FOUND_MESSAGE))?;
    Ok(target.records.remove(index))
}
