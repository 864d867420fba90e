//! The stateful filter manager behind a listing page.
//!
//! A [`FilterManager`] owns the search, filter and sort state for one page
//! view. Every change ends in [`FilterManager::apply`], which writes the state
//! back to the navigation URL, hands the filtered records to the `on_filter`
//! callback, and refreshes the active filter tags.
//!
//! Typed input (search text and filter selects) is debounced; sort changes,
//! resets and tag removals apply at once and supersede any pending apply.

use std::fmt;
use std::time::Duration;

use url::Url;

use super::debounce::{Clock, DEFAULT_DEBOUNCE_DELAY, Debouncer, Scheduled};
use super::query::FilterQuery;
use super::state::{FilterState, SortDirection};
use super::tags::ActiveFilterTag;
use super::url_sync::{Location, decode_state, state_url};
use super::view::{DetachedView, FilterView};
use crate::records::Record;
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

/// Fields scanned by free-text search when none are configured.
pub const DEFAULT_SEARCH_FIELDS: [&str; 6] = [
    "customerName",
    "make",
    "model",
    "vin",
    "contractNo",
    "plateNo",
];

/// Callback receiving the filtered and sorted records after each apply.
pub type FilterCallback = Box<dyn FnMut(&[Record])>;

/// Options accepted when constructing a [`FilterManager`].
pub struct FilterOptions {
    /// Fields scanned by free-text search, in order.
    pub search_fields: Vec<String>,
    /// Window within which search and filter updates are coalesced.
    pub debounce_delay: Duration,
    /// Whether state is read from and written back to the navigation URL.
    pub save_to_url: bool,
    /// Called with the derived collection after every applied change.
    pub on_filter: Option<FilterCallback>,
}

impl FilterOptions {
    /// Sets the search fields, returning the options for chaining.
    #[must_use]
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the debounce window, returning the options for chaining.
    #[must_use]
    pub const fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Enables or disables URL synchronisation.
    #[must_use]
    pub const fn with_save_to_url(mut self, save_to_url: bool) -> Self {
        self.save_to_url = save_to_url;
        self
    }

    /// Sets the callback invoked after every applied change.
    #[must_use]
    pub fn with_on_filter(mut self, callback: impl FnMut(&[Record]) + 'static) -> Self {
        self.on_filter = Some(Box::new(callback));
        self
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            search_fields: DEFAULT_SEARCH_FIELDS.map(str::to_owned).to_vec(),
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            save_to_url: true,
            on_filter: None,
        }
    }
}

impl fmt::Debug for FilterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterOptions")
            .field("search_fields", &self.search_fields)
            .field("debounce_delay", &self.debounce_delay)
            .field("save_to_url", &self.save_to_url)
            .field("on_filter", &self.on_filter.is_some())
            .finish()
    }
}

/// Search, filter and sort state for one listing page, kept in sync with
/// the navigation URL and the page's filter elements.
pub struct FilterManager<V: FilterView = DetachedView> {
    state: FilterState,
    search_fields: Vec<String>,
    save_to_url: bool,
    on_filter: Option<FilterCallback>,
    records: Vec<Record>,
    debouncer: Debouncer,
    location: Box<dyn Location>,
    clock: Box<dyn Clock>,
    telemetry: Box<dyn TelemetrySink>,
    view: V,
}

impl FilterManager<DetachedView> {
    /// Creates a manager bound to a navigation context and a clock.
    ///
    /// When `save_to_url` is set the initial state is decoded from the
    /// location's current query string. Construction never applies.
    pub fn new(
        options: FilterOptions,
        location: impl Location + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        let FilterOptions {
            search_fields,
            debounce_delay,
            save_to_url,
            on_filter,
        } = options;

        let state = if save_to_url {
            let state = decode_state(&location.href());
            tracing::debug!(
                "hydrated filter state from URL: {} filters, search {:?}",
                state.filters().len(),
                state.search_query()
            );
            state
        } else {
            FilterState::new()
        };

        Self {
            state,
            search_fields,
            save_to_url,
            on_filter,
            records: Vec::new(),
            debouncer: Debouncer::new(debounce_delay),
            location: Box::new(location),
            clock: Box::new(clock),
            telemetry: Box::new(NoopTelemetrySink),
            view: DetachedView,
        }
    }
}

impl<V: FilterView> FilterManager<V> {
    /// Binds the manager to page elements, replacing the current view.
    pub fn with_view<W: FilterView>(self, view: W) -> FilterManager<W> {
        FilterManager {
            state: self.state,
            search_fields: self.search_fields,
            save_to_url: self.save_to_url,
            on_filter: self.on_filter,
            records: self.records,
            debouncer: self.debouncer,
            location: self.location,
            clock: self.clock,
            telemetry: self.telemetry,
            view,
        }
    }

    /// Routes telemetry events to `sink`.
    #[must_use]
    pub fn with_telemetry(mut self, sink: impl TelemetrySink + 'static) -> Self {
        self.telemetry = Box::new(sink);
        self
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.state
    }

    /// Returns the fields scanned by free-text search.
    #[must_use]
    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    /// Returns the bound view.
    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }

    /// Returns the bound view mutably.
    pub const fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Returns the records the `on_filter` callback is evaluated against.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Replaces the records the `on_filter` callback is evaluated against.
    ///
    /// Does not apply; call [`Self::apply`] to notify with the new data.
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    /// Stores a normalised search query and schedules a debounced apply.
    pub fn set_search(&mut self, query: &str) {
        self.state.set_search(query);
        self.schedule_apply();
    }

    /// Constrains a field to `value`, or removes the constraint when `value`
    /// is empty, and schedules a debounced apply.
    pub fn set_filter(&mut self, key: &str, value: &str) {
        self.state.set_filter(key, value);
        self.schedule_apply();
    }

    /// Sets the sort order and applies immediately.
    pub fn set_sort(&mut self, field: &str, direction: SortDirection) {
        self.state.set_sort(field, direction);
        self.apply();
    }

    /// Sorts by `field` in the default (descending) direction and applies
    /// immediately.
    pub fn set_sort_field(&mut self, field: &str) {
        self.set_sort(field, SortDirection::default());
    }

    /// Clears search, filters and sort, empties the bound inputs and applies
    /// immediately.
    pub fn reset(&mut self) {
        self.state.reset();
        self.view.set_search_input("");
        self.view.clear_all_filter_selects();
        self.apply();
    }

    /// Clears the search query and its input, then applies immediately.
    pub fn clear_search(&mut self) {
        self.state.clear_search();
        self.view.set_search_input("");
        self.apply();
    }

    /// Removes one filter and resets its select, then applies immediately.
    pub fn clear_filter(&mut self, key: &str) {
        self.state.clear_filter(key);
        self.view.clear_filter_select(key);
        self.apply();
    }

    /// Returns a filtered and sorted copy of `data` for the current state.
    ///
    /// Neither `data` nor the manager is modified.
    #[must_use]
    pub fn get_filtered_data(&self, data: &[Record]) -> Vec<Record> {
        FilterQuery::new(&self.state, &self.search_fields).apply(data)
    }

    /// Returns the active filter tags for the current state.
    #[must_use]
    pub fn active_tags(&self) -> Vec<ActiveFilterTag> {
        ActiveFilterTag::from_state(&self.state)
    }

    /// Returns the current location with the state encoded in its query.
    #[must_use]
    pub fn current_url(&self) -> Url {
        state_url(&self.location.href(), &self.state)
    }

    /// Returns true when a debounced apply is waiting for its deadline.
    #[must_use]
    pub const fn has_pending_apply(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Returns the clock time at which the pending apply becomes due.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Duration> {
        self.debouncer.deadline()
    }

    /// Runs the pending apply if its deadline has passed.
    ///
    /// Hosts call this from their event loop; it returns true when an apply
    /// ran.
    pub fn run_pending(&mut self) -> bool {
        if self.debouncer.take_due(self.clock.now()) {
            self.apply();
            true
        } else {
            false
        }
    }

    /// Pushes the current state everywhere it is mirrored.
    ///
    /// Rewrites the URL (when enabled), notifies `on_filter` with the derived
    /// records, refreshes the active filter tags, and records telemetry. Any
    /// pending debounced apply is dropped since this one supersedes it.
    pub fn apply(&mut self) {
        if self.debouncer.cancel() {
            tracing::debug!("immediate apply superseded a pending debounced apply");
        }

        if self.save_to_url {
            let url = self.current_url();
            tracing::debug!("replacing navigation URL with {url}");
            self.location.replace(url);
        }

        let filtered = self.get_filtered_data(&self.records);
        if let Some(callback) = self.on_filter.as_mut() {
            callback(&filtered);
        }

        let tags = self.active_tags();
        self.view.render_active_tags(&tags);

        self.telemetry.record(TelemetryEvent::FiltersApplied {
            total: self.records.len(),
            matched: filtered.len(),
            url_synced: self.save_to_url,
        });
    }

    fn schedule_apply(&mut self) {
        let now = self.clock.now();
        match self.debouncer.schedule(now) {
            Scheduled::Fresh => {
                tracing::debug!("scheduled filter apply in {:?}", self.debouncer.delay());
            }
            Scheduled::Superseded => {
                tracing::debug!("rescheduled pending filter apply");
            }
        }
    }
}

impl<V: FilterView + fmt::Debug> fmt::Debug for FilterManager<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterManager")
            .field("state", &self.state)
            .field("search_fields", &self.search_fields)
            .field("save_to_url", &self.save_to_url)
            .field("records", &self.records.len())
            .field("debouncer", &self.debouncer)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
