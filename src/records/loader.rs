//! Loading record collections from JSON files.
//!
//! Two layouts are accepted: a JSON array of record objects, or an object
//! keyed by document identifier (the shape of a collection export). In the
//! keyed layout the key is copied into an `id` field unless the record
//! already carries one.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::{Map, Value};

use super::{FieldValue, Record};
use crate::error::FilterError;

const ID_FIELD: &str = "id";

/// Reads and parses a record collection from a JSON file.
///
/// # Errors
///
/// Returns [`FilterError::Io`] when the file cannot be read and
/// [`FilterError::RecordFormat`] when its contents are not a record
/// collection.
pub fn load_records(path: &Utf8Path) -> Result<Vec<Record>, FilterError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| FilterError::Io {
        message: format!("invalid records path '{path}': no file name"),
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        FilterError::Io {
            message: format!("failed to open records directory '{parent}': {error}"),
        }
    })?;
    let content = dir
        .read_to_string(file_name)
        .map_err(|error| FilterError::Io {
            message: format!("failed to read records file '{path}': {error}"),
        })?;

    let records = parse_records(&content)?;
    tracing::debug!("loaded {} records from '{path}'", records.len());
    Ok(records)
}

/// Parses a record collection from JSON text.
///
/// # Errors
///
/// Returns [`FilterError::RecordFormat`] when the text is not valid JSON, is
/// neither an array nor an object, or contains an entry that is not an
/// object.
pub fn parse_records(content: &str) -> Result<Vec<Record>, FilterError> {
    let document: Value = serde_json::from_str(content).map_err(|error| {
        FilterError::RecordFormat {
            message: format!("invalid JSON: {error}"),
        }
    })?;

    match document {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| expect_object(item, &format!("entry {index}")).map(Record::from))
            .collect(),
        Value::Object(documents) => documents
            .into_iter()
            .map(|(id, item)| {
                let fields = expect_object(item, &format!("document '{id}'"))?;
                Ok(keyed_record(id, fields))
            })
            .collect(),
        other => Err(FilterError::RecordFormat {
            message: format!("expected an array or object of records, found {}", kind(&other)),
        }),
    }
}

fn keyed_record(id: String, fields: Map<String, Value>) -> Record {
    let mut record = Record::from(fields);
    if record.get(ID_FIELD).is_none() {
        record.insert(ID_FIELD, FieldValue::Text(id));
    }
    record
}

fn expect_object(item: Value, label: &str) -> Result<Map<String, Value>, FilterError> {
    match item {
        Value::Object(fields) => Ok(fields),
        other => Err(FilterError::RecordFormat {
            message: format!("{label} must be an object, found {}", kind(&other)),
        }),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
