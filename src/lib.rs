//! Search, filter and sort state for record listing pages.
//!
//! The library keeps a listing page's free-text search, per-field filters
//! and sort order in one [`FilterManager`], mirrors that state into the
//! navigation URL so views can be bookmarked and shared, and derives the
//! filtered, sorted collection handed to whatever renders the list.
//!
//! Records are loose JSON-like objects ([`Record`]); [`load_records`] reads
//! them from disk for the bundled command-line tool.

pub mod config;
pub mod error;
pub mod filters;
pub mod records;
pub mod telemetry;

pub use config::{FilterAppConfig, OutputFormat};
pub use error::FilterError;
pub use filters::{
    ActiveFilterTag, FilterManager, FilterOptions, FilterState, FilterView, HtmlTagsView,
    Location, ManualClock, MemoryLocation, SortDirection, SystemClock,
};
pub use records::{FieldValue, Record, load_records, parse_records};
pub use telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink};
