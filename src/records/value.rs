//! Tagged field values carried by records.
//!
//! Listing data arrives as loosely typed JSON: strings, numbers, booleans and
//! date-like timestamp objects. [`FieldValue`] fixes those shapes into an
//! explicit enum so that matching and sorting apply documented coercions
//! instead of relying on whatever the source happened to contain.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Key under which an extended-JSON date string is stored.
const EXTENDED_DATE_KEY: &str = "$date";

/// A single value held by a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text, including numeric strings such as `"50000"`.
    Text(String),
    /// A JSON number.
    Number(f64),
    /// A JSON boolean.
    Bool(bool),
    /// A value that exposed a date conversion in the source data.
    Date(DateTime<Utc>),
}

impl FieldValue {
    /// Converts a JSON value into a field value.
    ///
    /// Returns `None` for `null`, which is treated the same as an absent
    /// field. Timestamp objects (`{"seconds", "nanoseconds"}`, with or without
    /// leading underscores) and `{"$date": ...}` objects become
    /// [`FieldValue::Date`]. Other arrays and objects are kept as text holding
    /// their compact JSON rendering.
    #[must_use]
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(flag) => Some(Self::Bool(flag)),
            Value::Number(number) => number.as_f64().map(Self::Number),
            Value::String(text) => Some(Self::Text(text)),
            Value::Object(map) => Some(
                date_from_object(&map).map_or_else(|| Self::Text(compact_json(map)), Self::Date),
            ),
            Value::Array(items) => Some(Self::Text(Value::Array(items).to_string())),
        }
    }

    /// Returns the date carried by this value, if it has one.
    #[must_use]
    pub const fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Date(date) => Some(date),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write_number(f, *number),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Date(date) => f.write_str(&date.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Number(number) => match exact_integer(*number) {
                Some(integer) => serializer.serialize_i64(integer),
                None => serializer.serialize_f64(*number),
            },
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Date(date) => {
                use serde::ser::SerializeMap;

                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(
                    EXTENDED_DATE_KEY,
                    &date.to_rfc3339_opts(SecondsFormat::Millis, true),
                )?;
                map.end()
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for FieldValue {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(date: DateTime<Utc>) -> Self {
        Self::Date(date)
    }
}

/// Writes a number the way listing data prints it: integral values carry no
/// fractional part and negative zero prints as `0`.
fn write_number(f: &mut fmt::Formatter<'_>, number: f64) -> fmt::Result {
    if number == 0.0 {
        return f.write_str("0");
    }
    write!(f, "{number}")
}

/// Largest magnitude below which every integral `f64` is exact.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Returns the integer an integral number holds exactly, so `50000` is
/// written back as `50000` rather than `50000.0`.
fn exact_integer(number: f64) -> Option<i64> {
    if number.fract() != 0.0 || number.abs() > MAX_EXACT_INTEGER {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "integral and within the exact f64 range"
    )]
    let integer = number as i64;
    Some(integer)
}

fn compact_json(map: Map<String, Value>) -> String {
    Value::Object(map).to_string()
}

/// Recognises the timestamp shapes produced by the listing backend.
fn date_from_object(map: &Map<String, Value>) -> Option<DateTime<Utc>> {
    if let Some(raw) = map.get(EXTENDED_DATE_KEY) {
        return extended_json_date(raw);
    }

    let seconds = map
        .get("seconds")
        .or_else(|| map.get("_seconds"))
        .and_then(Value::as_i64)?;
    let nanoseconds = map
        .get("nanoseconds")
        .or_else(|| map.get("_nanoseconds"))
        .and_then(Value::as_u64)
        .and_then(|nanos| u32::try_from(nanos).ok())?;
    DateTime::from_timestamp(seconds, nanoseconds)
}

fn extended_json_date(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|date| date.with_timezone(&Utc)),
        Value::Number(millis) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}
