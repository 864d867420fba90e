//! Applies the filter state carried by a navigation URL to a record file.
//!
//! The tool builds the same [`FilterManager`] a listing page would, hydrates
//! it from `--url`, applies once, and prints the canonical URL followed by
//! the derived records.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use camino::Utf8Path;
use nf_filters::telemetry::TelemetrySink;
use nf_filters::{
    FilterAppConfig, FilterError, FilterManager, HtmlTagsView, Location, MemoryLocation, Record,
    StderrJsonlTelemetrySink, SystemClock, load_records,
};

use super::output::write_results;

/// Filters the configured records and writes the results to stdout.
///
/// # Errors
///
/// Returns an error if:
/// - The records path or URL is missing or invalid
/// - The output format is unknown
/// - The records file cannot be read or parsed
/// - Writing to stdout fails
pub fn run(config: &FilterAppConfig) -> Result<(), FilterError> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    run_to(config, &mut writer, StderrJsonlTelemetrySink)
}

/// Filters the configured records and writes the results to `writer`.
///
/// # Errors
///
/// See [`run`].
pub fn run_to<W: Write>(
    config: &FilterAppConfig,
    writer: &mut W,
    telemetry: impl TelemetrySink + 'static,
) -> Result<(), FilterError> {
    let records_path = Utf8Path::new(config.require_records()?);
    let format = config.output_format()?;
    let location = MemoryLocation::parse(config.require_url()?)?;
    let records = load_records(records_path)?;

    let filtered: Rc<RefCell<Vec<Record>>> = Rc::default();
    let sink = Rc::clone(&filtered);
    let options = config
        .filter_options()
        .with_on_filter(move |result: &[Record]| *sink.borrow_mut() = result.to_vec());

    let mut manager = FilterManager::new(options, location.clone(), SystemClock::new())
        .with_view(HtmlTagsView::new())
        .with_telemetry(telemetry);
    manager.set_records(records);
    manager.apply();

    let result = filtered.borrow();
    write_results(
        writer,
        location.href().as_str(),
        &result,
        manager.view().html(),
        format,
    )
}
