//! Mirroring filter state to and from the navigation URL.
//!
//! # Encoding
//!
//! | Parameter | State                         | Written when            |
//! |-----------|-------------------------------|-------------------------|
//! | `q`       | search query                  | query is non-empty      |
//! | `sort`    | sort field                    | field is not `createdAt`|
//! | `dir`     | sort direction (`asc`)        | direction is ascending  |
//! | any other | one field filter              | always                  |
//!
//! Filters are written in key order. The serialised query replaces the
//! current one in place, without creating a history entry, and an empty
//! parameter set leaves the bare path.

use std::cell::RefCell;
use std::rc::Rc;

use url::Url;
use url::form_urlencoded;

use super::state::{DEFAULT_SORT_FIELD, FilterState, SortDirection};

/// Query parameter carrying the search query.
pub const SEARCH_PARAM: &str = "q";
/// Query parameter carrying the sort field.
pub const SORT_PARAM: &str = "sort";
/// Query parameter carrying the sort direction.
pub const DIRECTION_PARAM: &str = "dir";

/// The navigation context a manager reads its initial state from and
/// writes its state back to.
pub trait Location {
    /// Returns the current URL.
    fn href(&self) -> Url;

    /// Replaces the current URL without adding a history entry.
    fn replace(&mut self, url: Url);
}

/// An in-memory navigation context.
///
/// Clones share the same underlying URL, so a caller can hand one clone to a
/// manager and inspect the other.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    inner: Rc<RefCell<MemoryHistory>>,
}

#[derive(Debug)]
struct MemoryHistory {
    current: Url,
    entries: usize,
    replacements: usize,
}

impl MemoryLocation {
    /// Creates a context positioned at `url` with a single history entry.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryHistory {
                current: url,
                entries: 1,
                replacements: 0,
            })),
        }
    }

    /// Parses `href` and creates a context positioned at it.
    ///
    /// # Errors
    ///
    /// Returns the parser error when `href` is not an absolute URL.
    pub fn parse(href: &str) -> Result<Self, url::ParseError> {
        Url::parse(href).map(Self::new)
    }

    /// Returns the number of history entries; replacements never add one.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.inner.borrow().entries
    }

    /// Returns how many times the URL has been replaced.
    #[must_use]
    pub fn replacements(&self) -> usize {
        self.inner.borrow().replacements
    }

    /// Navigates to a new URL, pushing a history entry.
    pub fn push(&self, url: Url) {
        let mut history = self.inner.borrow_mut();
        history.current = url;
        history.entries = history.entries.saturating_add(1);
    }
}

impl Location for MemoryLocation {
    fn href(&self) -> Url {
        self.inner.borrow().current.clone()
    }

    fn replace(&mut self, url: Url) {
        let mut history = self.inner.borrow_mut();
        history.current = url;
        history.replacements = history.replacements.saturating_add(1);
    }
}

/// Builds filter state from a URL's query parameters.
///
/// `q`, `sort` and `dir` map to the search query and sort order; every other
/// parameter with a non-empty value becomes a filter, with the last
/// occurrence of a repeated key winning.
#[must_use]
pub fn decode_state(url: &Url) -> FilterState {
    let mut state = FilterState::new();
    let mut sort_field = None;
    let mut direction = SortDirection::default();

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            SEARCH_PARAM => state.set_search(&value),
            SORT_PARAM => sort_field = Some(value.into_owned()),
            DIRECTION_PARAM => {
                direction = SortDirection::from_token(&value);
                if value.parse::<SortDirection>().is_err() {
                    tracing::debug!("treating unknown sort direction '{value}' as ascending");
                }
            }
            _ => state.set_filter(&key, &value),
        }
    }

    let field = sort_field.unwrap_or_default();
    state.set_sort(&field, direction);
    state
}

/// Serialises filter state to a query string, or `None` when every
/// parameter would be omitted.
#[must_use]
pub fn encode_query(state: &FilterState) -> Option<String> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut written = false;

    if !state.search_query().is_empty() {
        serializer.append_pair(SEARCH_PARAM, state.search_query());
        written = true;
    }
    for (key, value) in state.filters() {
        serializer.append_pair(key, value);
        written = true;
    }
    if state.sort_field() != DEFAULT_SORT_FIELD {
        serializer.append_pair(SORT_PARAM, state.sort_field());
        written = true;
    }
    if state.sort_direction() != SortDirection::Descending {
        serializer.append_pair(DIRECTION_PARAM, state.sort_direction().token());
        written = true;
    }

    written.then(|| serializer.finish())
}

/// Returns `base` with its query replaced by the encoding of `state`.
///
/// The fragment is dropped, and an empty encoding leaves the bare path.
#[must_use]
pub fn state_url(base: &Url, state: &FilterState) -> Url {
    let mut url = base.clone();
    url.set_fragment(None);
    url.set_query(encode_query(state).as_deref());
    url
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const BASE: &str = "https://evaluations.example/vehicles";

    fn url(query: &str) -> Url {
        Url::parse(&format!("{BASE}{query}")).expect("test URL should parse")
    }

    #[rstest]
    fn decodes_reserved_and_filter_parameters() {
        let state = decode_state(&url("?q=Camry&make=Toyota&sort=marketValue&dir=asc&status=done"));

        assert_eq!(state.search_query(), "camry");
        assert_eq!(state.filter("make"), Some("Toyota"));
        assert_eq!(state.filter("status"), Some("done"));
        assert_eq!(state.sort_field(), "marketValue");
        assert_eq!(state.sort_direction(), SortDirection::Ascending);
    }

    #[rstest]
    #[case::no_query("")]
    #[case::empty_values("?q=&make=&sort=")]
    fn missing_or_empty_parameters_leave_defaults(#[case] query: &str) {
        let state = decode_state(&url(query));
        assert_eq!(state, FilterState::default());
    }

    #[rstest]
    fn repeated_filter_keys_keep_the_last_value() {
        let state = decode_state(&url("?make=Toyota&make=Honda"));
        assert_eq!(state.filter("make"), Some("Honda"));
    }

    #[rstest]
    fn encoding_omits_defaults() {
        let state = FilterState::default();
        assert_eq!(encode_query(&state), None);
        assert_eq!(state_url(&url("?make=Toyota#top"), &state).as_str(), BASE);
    }

    #[rstest]
    fn encoding_orders_search_filters_then_sort() {
        let mut state = FilterState::new();
        state.set_filter("model", "Camry LE");
        state.set_filter("make", "Toyota");
        state.set_search("red car");
        state.set_sort("marketValue", SortDirection::Ascending);

        assert_eq!(
            encode_query(&state).as_deref(),
            Some("q=red+car&make=Toyota&model=Camry+LE&sort=marketValue&dir=asc")
        );
    }

    #[rstest]
    #[case::search_only("?q=honda")]
    #[case::filters_and_sort("?make=Toyota&plateNo=ABC+123&sort=marketValue")]
    #[case::ascending_default_field("?dir=asc")]
    #[case::reserved_characters("?customerName=O%27Neil+%26+Sons&q=a%3Db")]
    fn decoded_state_round_trips(#[case] query: &str) {
        let decoded = decode_state(&url(query));
        let reencoded = state_url(&url(""), &decoded);

        assert_eq!(decode_state(&reencoded), decoded);
        assert_eq!(state_url(&reencoded, &decoded), reencoded);
    }

    #[rstest]
    fn filters_on_reserved_keys_do_not_leak_into_the_url() {
        let mut state = FilterState::new();
        state.set_filter(SEARCH_PARAM, "Toyota");
        state.set_filter(DIRECTION_PARAM, "x");
        state.set_filter("make", "Honda");

        let encoded = state_url(&url(""), &state);

        assert_eq!(encoded.query(), Some("make=Honda"));
        assert_eq!(decode_state(&encoded), state);
    }

    #[rstest]
    fn pushing_adds_a_history_entry_but_replacing_does_not() {
        let mut location = MemoryLocation::parse(BASE).expect("base URL should parse");

        location.push(url("?make=Toyota"));
        location.replace(url("?make=Honda"));

        assert_eq!(location.history_len(), 2);
        assert_eq!(location.replacements(), 1);
        assert_eq!(location.href().query(), Some("make=Honda"));
    }

    #[rstest]
    fn replacing_does_not_grow_history() {
        let mut location = MemoryLocation::parse(BASE).expect("base URL should parse");
        let observer = location.clone();

        location.replace(url("?make=Toyota"));

        assert_eq!(observer.history_len(), 1);
        assert_eq!(observer.replacements(), 1);
        assert_eq!(observer.href().query(), Some("make=Toyota"));
        assert_eq!(decode_state(&observer.href()).sort_field(), DEFAULT_SORT_FIELD);
    }
}
