//! Deriving a filtered and sorted view of a record collection.
//!
//! The derivation runs in three passes:
//! 1. free-text search across the configured search fields
//! 2. exact matching of each field filter (filters conjoin)
//! 3. a stable sort on the sort field
//!
//! # Sort coercion
//!
//! Values are compared through a [`SortKey`]: dates compare as instants,
//! numbers and numeric strings compare as `f64`, and everything else
//! compares as its string rendering. Values of different kinds are ordered
//! by rank: absent, then numbers, then dates, then text. Descending order
//! reverses the whole comparison, so absent values come last by default.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::state::{FilterState, SortDirection};
use crate::records::{FieldValue, Record};

/// A borrowed view of the state needed to filter one collection.
#[derive(Debug, Clone, Copy)]
pub struct FilterQuery<'a> {
    state: &'a FilterState,
    search_fields: &'a [String],
}

impl<'a> FilterQuery<'a> {
    /// Creates a query over the given state and search fields.
    #[must_use]
    pub const fn new(state: &'a FilterState, search_fields: &'a [String]) -> Self {
        Self {
            state,
            search_fields,
        }
    }

    /// Returns a new filtered and sorted collection.
    ///
    /// `data` is left untouched and the result owns its records.
    #[must_use]
    pub fn apply(&self, data: &[Record]) -> Vec<Record> {
        let mut matched: Vec<Record> = data
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();
        self.sort(&mut matched);
        matched
    }

    /// Returns true when a record passes the search and every filter.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_search(record) && self.matches_filters(record)
    }

    fn matches_search(&self, record: &Record) -> bool {
        let query = self.state.search_query();
        if query.is_empty() {
            return true;
        }
        self.search_fields.iter().any(|field| {
            record
                .get(field)
                .is_some_and(|value| value.to_string().to_lowercase().contains(query))
        })
    }

    fn matches_filters(&self, record: &Record) -> bool {
        self.state.filters().iter().all(|(key, expected)| {
            record
                .get(key)
                .is_some_and(|value| value.to_string() == *expected)
        })
    }

    /// Sorts records in place on the state's sort field.
    ///
    /// `slice::sort_by` is stable, so records with equal keys keep their
    /// input order in either direction.
    pub fn sort(&self, records: &mut [Record]) {
        let field = self.state.sort_field();
        let direction = self.state.sort_direction();
        records.sort_by(|a, b| {
            let ordering = compare_values(a.get(field), b.get(field));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

/// A field value coerced for comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    /// The field is absent.
    Absent,
    /// A number, or text that parses as one.
    Number(f64),
    /// A date-like value.
    Date(DateTime<Utc>),
    /// Any other value, by its string rendering.
    Text(String),
}

impl SortKey {
    /// Coerces a field value for comparison.
    #[must_use]
    pub fn of(value: Option<&FieldValue>) -> Self {
        match value {
            None => Self::Absent,
            Some(FieldValue::Date(date)) => Self::Date(*date),
            Some(FieldValue::Number(number)) => Self::Number(*number),
            Some(FieldValue::Text(text)) => {
                parse_numeric_text(text).map_or_else(|| Self::Text(text.clone()), Self::Number)
            }
            Some(other @ FieldValue::Bool(_)) => Self::Text(other.to_string()),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Absent => 0,
            Self::Number(_) => 1,
            Self::Date(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

impl Eq for SortKey {}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Compares two optional field values in ascending order.
#[must_use]
pub fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    SortKey::of(a).cmp(&SortKey::of(b))
}

/// Parses text that reads as a decimal number, such as `"50000"` or
/// `" 1.5e3 "`.
///
/// Words like `inf` and `NaN` stay text even though `f64::from_str` accepts
/// them.
fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty()
        || trimmed
            .chars()
            .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| !number.is_nan())
}
