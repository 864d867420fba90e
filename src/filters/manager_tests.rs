//! Unit tests for the filter manager.

use std::cell::RefCell;
use std::rc::Rc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::filters::debounce::ManualClock;
use crate::filters::test_support::{SAMPLE_PAGE, sample_vehicles};
use crate::filters::url_sync::MemoryLocation;
use crate::filters::view::{HtmlTagsView, MockFilterView};
use crate::records::FieldValue;
use crate::telemetry::test_support::RecordingTelemetrySink;

const PAGE: &str = SAMPLE_PAGE;

type Notifications = Rc<RefCell<Vec<Vec<Record>>>>;

struct Harness {
    manager: FilterManager,
    location: MemoryLocation,
    clock: ManualClock,
    notifications: Notifications,
}

fn harness_at(href: &str) -> Harness {
    let location = MemoryLocation::parse(href).expect("test URL should parse");
    let clock = ManualClock::new();
    let notifications: Notifications = Rc::default();
    let sink = Rc::clone(&notifications);
    let options = FilterOptions::default()
        .with_on_filter(move |records: &[Record]| sink.borrow_mut().push(records.to_vec()));

    let mut manager = FilterManager::new(options, location.clone(), clock.clone());
    manager.set_records(sample_vehicles());

    Harness {
        manager,
        location,
        clock,
        notifications,
    }
}

#[fixture]
fn harness() -> Harness {
    harness_at(PAGE)
}

fn makes(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.get("make").map(ToString::to_string))
        .collect()
}

#[rstest]
fn filter_by_make_keeps_matching_vehicle(mut harness: Harness) {
    harness.manager.set_filter("make", "Toyota");

    let result = harness.manager.get_filtered_data(&sample_vehicles());

    assert_eq!(makes(&result), vec!["Toyota"]);
    assert_eq!(
        result.first().and_then(|record| record.get("marketValue")),
        Some(&FieldValue::from("50000"))
    );
}

#[rstest]
fn unconstrained_state_returns_everything_sorted(harness: Harness) {
    let result = harness.manager.get_filtered_data(&sample_vehicles());

    assert_eq!(makes(&result), vec!["Honda", "Toyota"]);
}

#[rstest]
fn reset_after_search_returns_everything(mut harness: Harness) {
    harness.manager.set_search("honda");
    harness.manager.reset();

    let result = harness.manager.get_filtered_data(&sample_vehicles());

    assert_eq!(result.len(), 2);
    assert!(!harness.manager.has_pending_apply());
}

#[rstest]
fn reset_is_idempotent(mut harness: Harness) {
    harness.manager.set_search("camry");
    harness.manager.set_sort("marketValue", SortDirection::Ascending);

    harness.manager.reset();
    let once = harness.manager.state().clone();
    let url_once = harness.location.href();
    harness.manager.reset();

    assert_eq!(harness.manager.state(), &once);
    assert_eq!(harness.location.href(), url_once);
    assert_eq!(url_once.as_str(), PAGE);
}

#[rstest]
fn search_burst_notifies_once_with_last_query(mut harness: Harness) {
    harness.manager.set_search("t");
    harness.clock.advance_millis(100);
    harness.manager.set_search("to");
    harness.clock.advance_millis(100);
    harness.manager.set_search("Civ");

    harness.clock.advance_millis(299);
    assert!(!harness.manager.run_pending());
    assert!(harness.notifications.borrow().is_empty());

    harness.clock.advance_millis(1);
    assert!(harness.manager.run_pending());
    assert!(!harness.manager.run_pending());

    let notifications = harness.notifications.borrow();
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        notifications.first().map(|records| makes(records)),
        Some(vec!["Honda".to_owned()])
    );
    assert_eq!(harness.location.href().query(), Some("q=civ"));
}

#[rstest]
fn filter_updates_are_debounced(mut harness: Harness) {
    harness.manager.set_filter("make", "Toyota");

    assert!(harness.manager.has_pending_apply());
    assert_eq!(
        harness.manager.next_deadline(),
        Some(Duration::from_millis(300))
    );
    assert_eq!(harness.location.replacements(), 0);
}

#[rstest]
fn sort_applies_immediately_and_supersedes_pending(mut harness: Harness) {
    harness.manager.set_search("toyota");
    harness.manager.set_sort("marketValue", SortDirection::Ascending);

    assert!(!harness.manager.has_pending_apply());
    assert_eq!(harness.notifications.borrow().len(), 1);
    assert_eq!(
        harness.location.href().query(),
        Some("q=toyota&sort=marketValue&dir=asc")
    );

    harness.clock.advance_millis(1_000);
    assert!(!harness.manager.run_pending());
    assert_eq!(harness.notifications.borrow().len(), 1);
}

#[rstest]
fn sort_field_defaults_to_descending(mut harness: Harness) {
    harness.manager.set_sort("marketValue", SortDirection::Ascending);
    harness.manager.set_sort_field("marketValue");

    assert_eq!(
        harness.manager.state().sort_direction(),
        SortDirection::Descending
    );
    let notifications = harness.notifications.borrow();
    assert_eq!(
        notifications.last().map(|records| makes(records)),
        Some(vec!["Toyota".to_owned(), "Honda".to_owned()])
    );
}

#[rstest]
fn url_writes_replace_without_new_history(mut harness: Harness) {
    harness.manager.set_filter("make", "Honda");
    harness.clock.advance_millis(300);
    harness.manager.run_pending();
    harness.manager.clear_filter("make");

    assert_eq!(harness.location.history_len(), 1);
    assert_eq!(harness.location.replacements(), 2);
    assert_eq!(harness.location.href().as_str(), PAGE);
}

#[rstest]
fn state_round_trips_through_the_url(mut harness: Harness) {
    harness.manager.set_search("  Camry ");
    harness.manager.set_filter("make", "Toyota");
    harness.manager.set_filter("plateNo", "ABC 123");
    harness.manager.set_sort("marketValue", SortDirection::Ascending);

    let rehydrated = FilterManager::new(
        FilterOptions::default(),
        harness.location.clone(),
        ManualClock::new(),
    );

    assert_eq!(rehydrated.state(), harness.manager.state());
}

#[rstest]
fn construction_hydrates_from_query_string() {
    let harness = harness_at(&format!("{PAGE}?q=HONDA&status=pending&dir=asc"));
    let state = harness.manager.state();

    assert_eq!(state.search_query(), "honda");
    assert_eq!(state.filter("status"), Some("pending"));
    assert_eq!(state.sort_direction(), SortDirection::Ascending);
    assert!(harness.notifications.borrow().is_empty());
    assert_eq!(harness.location.replacements(), 0);
}

#[rstest]
fn disabled_url_sync_ignores_and_preserves_location() {
    let location =
        MemoryLocation::parse(&format!("{PAGE}?make=Toyota")).expect("test URL should parse");
    let options = FilterOptions::default().with_save_to_url(false);
    let mut manager = FilterManager::new(options, location.clone(), ManualClock::new());

    assert!(manager.state().filters().is_empty());

    manager.set_sort("make", SortDirection::Ascending);

    assert_eq!(location.replacements(), 0);
    assert_eq!(location.href().query(), Some("make=Toyota"));
}

#[rstest]
fn custom_search_fields_limit_search(mut harness: Harness) {
    let options = FilterOptions::default().with_search_fields(["vin"]);
    let mut manager = FilterManager::new(options, harness.location.clone(), ManualClock::new());
    manager.set_search("toyota");
    harness.manager.set_search("toyota");

    assert!(manager.get_filtered_data(&sample_vehicles()).is_empty());
    assert_eq!(
        makes(&harness.manager.get_filtered_data(&sample_vehicles())),
        vec!["Toyota"]
    );
}

#[rstest]
fn reset_clears_bound_inputs() {
    let mut view = MockFilterView::new();
    view.expect_set_search_input()
        .with(eq(""))
        .times(1)
        .return_const(());
    view.expect_clear_all_filter_selects()
        .times(1)
        .return_const(());
    view.expect_render_active_tags()
        .withf(|tags: &[ActiveFilterTag]| tags.is_empty())
        .times(1)
        .return_const(());

    let location = MemoryLocation::parse(PAGE).expect("test URL should parse");
    let mut manager =
        FilterManager::new(FilterOptions::default(), location, ManualClock::new()).with_view(view);

    manager.reset();
}

#[rstest]
fn clearing_a_filter_tag_resets_only_its_select() {
    let mut view = MockFilterView::new();
    view.expect_clear_filter_select()
        .with(eq("make"))
        .times(1)
        .return_const(());
    view.expect_render_active_tags()
        .withf(|tags: &[ActiveFilterTag]| {
            tags == [ActiveFilterTag::Filter {
                key: "model".to_owned(),
                value: "Civic".to_owned(),
            }]
        })
        .times(1)
        .return_const(());

    let location = MemoryLocation::parse(&format!("{PAGE}?make=Honda&model=Civic"))
        .expect("test URL should parse");
    let mut manager =
        FilterManager::new(FilterOptions::default(), location, ManualClock::new()).with_view(view);

    manager.clear_filter("make");

    assert_eq!(manager.state().filter("model"), Some("Civic"));
}

#[rstest]
fn clearing_search_tag_empties_the_input() {
    let location =
        MemoryLocation::parse(&format!("{PAGE}?q=camry&make=Toyota")).expect("test URL should parse");
    let mut manager = FilterManager::new(FilterOptions::default(), location, ManualClock::new())
        .with_view(HtmlTagsView::new());

    manager.view_mut().set_search_input("camry");
    manager.clear_search();

    assert_eq!(manager.view().search_input(), "");
    assert!(manager.view().html().contains("make: Toyota"));
    assert!(!manager.view().html().contains("camry"));
}

#[rstest]
fn apply_records_telemetry() {
    let sink = Rc::new(RecordingTelemetrySink::default());
    let location = MemoryLocation::parse(PAGE).expect("test URL should parse");
    let mut manager = FilterManager::new(FilterOptions::default(), location, ManualClock::new())
        .with_telemetry(Rc::clone(&sink));
    manager.set_records(sample_vehicles());

    manager.set_filter("make", "Honda");
    manager.apply();

    assert_eq!(
        sink.take(),
        vec![TelemetryEvent::FiltersApplied {
            total: 2,
            matched: 1,
            url_synced: true,
        }]
    );
}
