//! Search, filter and sort state for listing pages.
//!
//! [`FilterManager`] is the entry point. The submodules hold the pieces it is
//! built from: the plain [`FilterState`] value, the pure [`FilterQuery`]
//! pipeline, URL encoding in [`url_sync`], the [`Debouncer`] used for typed
//! input, and the [`FilterView`] seam to page elements.

mod debounce;
mod manager;
mod query;
mod state;
mod tags;
pub mod url_sync;
mod view;

pub use debounce::{Clock, DEFAULT_DEBOUNCE_DELAY, Debouncer, ManualClock, Scheduled, SystemClock};
pub use manager::{DEFAULT_SEARCH_FIELDS, FilterCallback, FilterManager, FilterOptions};
pub use query::{FilterQuery, SortKey, compare_values};
pub use state::{
    DEFAULT_SORT_FIELD, FilterState, SortDirection, UnknownSortDirection, normalize_query,
};
pub use tags::{ActiveFilterTag, render_tags_html};
pub use url_sync::{Location, MemoryLocation, decode_state, encode_query, state_url};
pub use view::{DetachedView, FilterView, HtmlTagsView};

/// Fixtures shared by unit and behavioural tests.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use crate::records::Record;

    /// Navigation URL used by fixtures.
    pub const SAMPLE_PAGE: &str = "https://evaluations.example/vehicles";

    /// Two evaluations: a Toyota Camry valued 50000 and a Honda Civic valued
    /// 30000, created a month apart.
    #[must_use]
    pub fn sample_vehicles() -> Vec<Record> {
        vec![
            Record::new()
                .with("id", "eval-1")
                .with("customerName", "Ana Reyes")
                .with("make", "Toyota")
                .with("model", "Toyota Camry")
                .with("plateNo", "ABC 123")
                .with("marketValue", "50000")
                .with("createdAt", "2024-01-01"),
            Record::new()
                .with("id", "eval-2")
                .with("customerName", "Ben Okafor")
                .with("make", "Honda")
                .with("model", "Civic")
                .with("plateNo", "XYZ 789")
                .with("marketValue", "30000")
                .with("createdAt", "2024-02-01"),
        ]
    }
}
