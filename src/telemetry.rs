//! Telemetry events and sinks.
//!
//! The manager records one event per applied change. Nothing is transmitted
//! anywhere; the stderr sink exists for local debugging.

use std::io;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A structured telemetry event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A filter state change was applied to the record collection.
    FiltersApplied {
        /// Number of records supplied to the manager.
        total: usize,
        /// Number of records that survived search and filters.
        matched: usize,
        /// Whether the navigation URL was rewritten.
        url_synced: bool,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for Rc<T> {
    fn record(&self, event: TelemetryEvent) {
        (**self).record(event);
    }
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Test helpers for capturing telemetry.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::cell::RefCell;

    use super::{TelemetryEvent, TelemetrySink};

    /// A sink that keeps every event it receives.
    #[derive(Debug, Default)]
    pub struct RecordingTelemetrySink {
        events: RefCell<Vec<TelemetryEvent>>,
    }

    impl RecordingTelemetrySink {
        /// Removes and returns the recorded events.
        pub fn take(&self) -> Vec<TelemetryEvent> {
            self.events.borrow_mut().drain(..).collect()
        }
    }

    impl TelemetrySink for RecordingTelemetrySink {
        fn record(&self, event: TelemetryEvent) {
            self.events.borrow_mut().push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingTelemetrySink;
    use super::{TelemetryEvent, TelemetrySink};

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingTelemetrySink::default();
        sink.record(TelemetryEvent::FiltersApplied {
            total: 2,
            matched: 1,
            url_synced: true,
        });

        assert_eq!(
            sink.take(),
            vec![TelemetryEvent::FiltersApplied {
                total: 2,
                matched: 1,
                url_synced: true,
            }]
        );
    }

    #[test]
    fn events_serialise_with_a_type_tag() {
        let event = TelemetryEvent::FiltersApplied {
            total: 3,
            matched: 0,
            url_synced: false,
        };

        let serialised = serde_json::to_string(&event).expect("event should serialise");

        assert_eq!(
            serialised,
            r#"{"type":"filters_applied","total":3,"matched":0,"url_synced":false}"#
        );
    }
}
