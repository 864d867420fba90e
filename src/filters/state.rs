//! Search, filter and sort state for a listing view.
//!
//! [`FilterState`] is the value the manager owns and mirrors into the query
//! string. Its setters uphold two invariants: the search query is always
//! stored normalised, and the filter map never holds an empty value.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::url_sync::{DIRECTION_PARAM, SEARCH_PARAM, SORT_PARAM};

/// Field the listing is sorted by until the user picks another.
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

/// Direction applied to the sort comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum SortDirection {
    /// Smallest values first.
    Ascending,
    /// Largest values first.
    #[default]
    Descending,
}

impl SortDirection {
    /// Returns the token used for this direction in query strings.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// Interprets a direction token leniently.
    ///
    /// Only `desc` selects descending order; every other token, including
    /// unknown ones, sorts ascending.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or(Self::Ascending)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error returned when a direction token is not `asc` or `desc`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort direction '{token}': expected 'asc' or 'desc'")]
pub struct UnknownSortDirection {
    /// The rejected token.
    pub token: String,
}

impl FromStr for SortDirection {
    type Err = UnknownSortDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            _ => Err(UnknownSortDirection {
                token: s.to_owned(),
            }),
        }
    }
}

/// Normalises free-text search input: trims surrounding whitespace and
/// lower-cases the rest.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Search text, field filters and sort order for one listing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    search_query: String,
    filters: BTreeMap<String, String>,
    sort_field: String,
    sort_direction: SortDirection,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            filters: BTreeMap::new(),
            sort_field: DEFAULT_SORT_FIELD.to_owned(),
            sort_direction: SortDirection::Descending,
        }
    }
}

impl FilterState {
    /// Creates the default state: no search, no filters, newest first.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the normalised search query; empty means no search.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Returns the active field filters in key order.
    #[must_use]
    pub const fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Returns the value a field is constrained to, if any.
    #[must_use]
    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Returns the field records are sorted by.
    #[must_use]
    pub fn sort_field(&self) -> &str {
        &self.sort_field
    }

    /// Returns the sort direction.
    #[must_use]
    pub const fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Returns true when neither a search nor any filter is active.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.search_query.is_empty() && self.filters.is_empty()
    }

    /// Returns true when the sort order is the default one.
    #[must_use]
    pub fn has_default_sort(&self) -> bool {
        self.sort_field == DEFAULT_SORT_FIELD && self.sort_direction == SortDirection::Descending
    }

    /// Stores a search query after normalising it.
    pub fn set_search(&mut self, query: &str) {
        self.search_query = normalize_query(query);
    }

    /// Constrains a field to a value, or removes the constraint when `value`
    /// is empty.
    ///
    /// Keys that collide with the reserved query parameters (`q`, `sort`,
    /// `dir`) are ignored, since they could not be written to the URL.
    pub fn set_filter(&mut self, key: &str, value: &str) {
        if is_reserved_key(key) {
            tracing::debug!("ignoring filter on reserved parameter '{key}'");
            return;
        }
        if value.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_owned(), value.to_owned());
        }
    }

    /// Removes the constraint on a field, returning true if one existed.
    pub fn clear_filter(&mut self, key: &str) -> bool {
        self.filters.remove(key).is_some()
    }

    /// Clears the search query.
    pub fn clear_search(&mut self) {
        self.search_query.clear();
    }

    /// Sets the sort field and direction. An empty field falls back to the
    /// default sort field.
    pub fn set_sort(&mut self, field: &str, direction: SortDirection) {
        field.clone_into(&mut self.sort_field);
        if self.sort_field.is_empty() {
            DEFAULT_SORT_FIELD.clone_into(&mut self.sort_field);
        }
        self.sort_direction = direction;
    }

    /// Restores the default state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn is_reserved_key(key: &str) -> bool {
    [SEARCH_PARAM, SORT_PARAM, DIRECTION_PARAM].contains(&key)
}
