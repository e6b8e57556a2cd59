// ═══════════════════════════════════════════════════════════════════
// Integration Tests — ExpenseTracker facade, observers, persistence,
// form handling and export
// ═══════════════════════════════════════════════════════════════════

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;

use expense_tracker_core::errors::CoreError;
use expense_tracker_core::form::ExpenseForm;
use expense_tracker_core::models::chart::BarChart;
use expense_tracker_core::models::expense::{AddOutcome, RejectReason};
use expense_tracker_core::models::settings::Settings;
use expense_tracker_core::models::view::{DashboardView, ListAction, ListView};
use expense_tracker_core::presentation::text::TextChartSurface;
use expense_tracker_core::presentation::traits::{ChartSurface, ExpenseObserver};
use expense_tracker_core::services::chart_service::ChartPresenter;
use expense_tracker_core::services::expense_service::Clock;
use expense_tracker_core::storage::backend::{FileStorage, KeyValueStore, MemoryStorage};
use expense_tracker_core::ExpenseTracker;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Test doubles
// ═══════════════════════════════════════════════════════════════════

struct FixedClock;

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        1_700_000_000_000
    }

    fn today(&self) -> NaiveDate {
        d(2024, 5, 1)
    }
}

/// Memory store that counts writes and can be told to fail them.
#[derive(Default)]
struct CountingStorage {
    inner: MemoryStorage,
    writes: usize,
    fail_writes: bool,
}

impl KeyValueStore for CountingStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.inner.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        if self.fail_writes {
            return Err(CoreError::Storage("quota exceeded".into()));
        }
        self.writes += 1;
        self.inner.set_item(key, value)
    }
}

/// Keeps every view it is sent.
#[derive(Default)]
struct Recorder {
    dashboards: Vec<DashboardView>,
    lists: Vec<ListView>,
}

impl ExpenseObserver for Recorder {
    fn expenses_changed(&mut self, view: &DashboardView) -> Result<(), CoreError> {
        self.dashboards.push(view.clone());
        Ok(())
    }

    fn list_toggled(&mut self, list: &ListView) -> Result<(), CoreError> {
        self.lists.push(list.clone());
        Ok(())
    }
}

struct BrokenCanvas;

impl ChartSurface for BrokenCanvas {
    type Handle = ();

    fn draw(&mut self, _chart: &BarChart) -> Result<(), CoreError> {
        Err(CoreError::Chart("canvas context lost".into()))
    }

    fn destroy(&mut self, _handle: ()) {}
}

fn tracker() -> ExpenseTracker<CountingStorage> {
    tracker_with(CountingStorage::default())
}

fn tracker_with<S: KeyValueStore>(storage: S) -> ExpenseTracker<S> {
    ExpenseTracker::open_with_clock(storage, Settings::default(), Box::new(FixedClock))
}

fn recorded(tracker: &mut ExpenseTracker<CountingStorage>) -> Rc<RefCell<Recorder>> {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    tracker.subscribe(Box::new(recorder.clone())).unwrap();
    recorder
}

// ═══════════════════════════════════════════════════════════════════
// End-to-end scenario
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_coffee_and_book_scenario() {
    let mut tracker = tracker();
    assert_eq!(tracker.expense_count(), 0);

    let coffee = tracker.add_expense("Coffee", 3.5).unwrap().id().unwrap();
    let book = tracker.add_expense("Book", 12.0).unwrap().id().unwrap();
    assert!(book > coffee);
    assert_eq!(tracker.total(), 15.5);
    assert_eq!(tracker.total_label(), "15.50");

    let items: Vec<&str> = tracker.expenses().iter().map(|e| e.item.as_str()).collect();
    assert_eq!(items, vec!["Book", "Coffee"]);

    assert!(tracker.remove_expense(coffee).unwrap());
    let items: Vec<&str> = tracker.expenses().iter().map(|e| e.item.as_str()).collect();
    assert_eq!(items, vec!["Book"]);
    assert_eq!(tracker.total(), 12.0);
}

#[test]
fn test_added_expense_is_dated_today() {
    let mut tracker = tracker();
    let id = tracker.add_expense("Coffee", 3.5).unwrap().id().unwrap();
    assert_eq!(tracker.get_expense(id).unwrap().date, d(2024, 5, 1));
}

#[test]
fn test_add_with_explicit_date() {
    let mut tracker = tracker();
    let id = tracker
        .add_expense_on("Rent", 800.0, d(2024, 4, 1))
        .unwrap()
        .id()
        .unwrap();
    assert_eq!(tracker.get_expense(id).unwrap().date, d(2024, 4, 1));
}

// ═══════════════════════════════════════════════════════════════════
// Validation & persistence
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_rejected_add_neither_persists_nor_notifies() {
    let mut tracker = tracker();
    let recorder = recorded(&mut tracker);

    let outcome = tracker.add_expense("", 5.0).unwrap();
    assert_eq!(outcome, AddOutcome::Rejected(RejectReason::EmptyItem));
    let outcome = tracker.add_expense_input("Coffee", "lots").unwrap();
    assert_eq!(outcome, AddOutcome::Rejected(RejectReason::AmountNotNumeric));
    let outcome = tracker.add_expense("Coffee", 0.0).unwrap();
    assert_eq!(outcome, AddOutcome::Rejected(RejectReason::AmountNotPositive));

    assert_eq!(tracker.expense_count(), 0);
    assert_eq!(tracker.storage().writes, 0);
    // Only the initial render from subscribe.
    assert_eq!(recorder.borrow().dashboards.len(), 1);
}

#[test]
fn test_every_mutation_is_persisted() {
    let mut tracker = tracker();
    let id = tracker.add_expense("Coffee", 3.5).unwrap().id().unwrap();
    assert_eq!(tracker.storage().writes, 1);
    tracker.remove_expense(id).unwrap();
    assert_eq!(tracker.storage().writes, 2);

    let raw = tracker.storage().get_item("expenses").unwrap().unwrap();
    assert_eq!(raw, "[]");
}

#[test]
fn test_remove_absent_id_is_noop() {
    let mut tracker = tracker();
    tracker.add_expense("Coffee", 3.5).unwrap();
    let before = tracker.expenses().to_vec();

    assert!(!tracker.remove_expense(42).unwrap());
    assert_eq!(tracker.expenses(), before.as_slice());
    assert_eq!(tracker.total(), 3.5);
}

#[test]
fn test_storage_write_failure_propagates() {
    let mut tracker = tracker_with(CountingStorage {
        fail_writes: true,
        ..CountingStorage::default()
    });
    let result = tracker.add_expense("Coffee", 3.5);
    assert!(matches!(result, Err(CoreError::Storage(_))));
}

#[test]
fn test_reopen_restores_collection() {
    let dir = tempfile::tempdir().unwrap();
    let (coffee, book) = {
        let mut tracker = tracker_with(FileStorage::open(dir.path()).unwrap());
        let coffee = tracker.add_expense("Coffee", 3.5).unwrap().id().unwrap();
        let book = tracker.add_expense("Book", 12.0).unwrap().id().unwrap();
        (coffee, book)
    };

    let mut reopened = tracker_with(FileStorage::open(dir.path()).unwrap());
    let ids: Vec<i64> = reopened.expenses().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![book, coffee]);
    assert_eq!(reopened.total(), 15.5);

    // New ids continue after the loaded ones even with a frozen clock.
    let next = reopened.add_expense("Tea", 2.0).unwrap().id().unwrap();
    assert!(next > book);
}

#[test]
fn test_corrupt_storage_starts_empty() {
    let mut storage = MemoryStorage::new();
    storage.set_item("expenses", "definitely not json").unwrap();
    let mut tracker = tracker_with(storage);
    assert_eq!(tracker.expense_count(), 0);

    tracker.add_expense("Coffee", 3.5).unwrap();
    let raw = tracker.storage().get_item("expenses").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
}

#[test]
fn test_custom_storage_key() {
    let settings = Settings {
        storage_key: "household".into(),
        ..Settings::default()
    };
    let mut tracker =
        ExpenseTracker::open_with_clock(MemoryStorage::new(), settings, Box::new(FixedClock));
    tracker.add_expense("Coffee", 3.5).unwrap();
    assert!(tracker.storage().get_item("household").unwrap().is_some());
    assert!(tracker.storage().get_item("expenses").unwrap().is_none());
}

// ═══════════════════════════════════════════════════════════════════
// Observers
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_subscribe_sends_initial_view() {
    let mut tracker = tracker();
    tracker.add_expense("Coffee", 3.5).unwrap();
    let recorder = recorded(&mut tracker);

    let rec = recorder.borrow();
    assert_eq!(rec.dashboards.len(), 1);
    assert_eq!(rec.dashboards[0].list.rows.len(), 1);
    assert_eq!(rec.dashboards[0].total_label, "3.50");
    assert_eq!(tracker.observer_count(), 1);
}

#[test]
fn test_mutations_notify_all_observers() {
    let mut tracker = tracker();
    let first = recorded(&mut tracker);
    let second = recorded(&mut tracker);

    let id = tracker.add_expense("Coffee", 3.5).unwrap().id().unwrap();
    tracker.add_expense("Book", 12.0).unwrap();
    tracker.remove_expense(id).unwrap();

    for recorder in [&first, &second] {
        let rec = recorder.borrow();
        assert_eq!(rec.dashboards.len(), 4);
        let last = rec.dashboards.last().unwrap();
        assert_eq!(last.total_label, "12.00");
        assert_eq!(last.list.rows.len(), 1);
        assert_eq!(last.list.rows[0].item, "Book");
        assert_eq!(last.chart.values, vec![12.0]);
    }
}

#[test]
fn test_toggle_rerenders_list_only() {
    let mut tracker = tracker();
    for i in 0..5 {
        tracker.add_expense(&format!("item {i}"), 1.0).unwrap();
    }
    let recorder = recorded(&mut tracker);
    let writes = tracker.storage().writes;

    assert_eq!(recorder.borrow().dashboards[0].list.rows.len(), 3);
    assert!(tracker.toggle_list().unwrap());
    assert!(tracker.is_expanded());

    {
        let rec = recorder.borrow();
        assert_eq!(rec.dashboards.len(), 1);
        assert_eq!(rec.lists.len(), 1);
        assert_eq!(rec.lists[0].rows.len(), 5);
        assert_eq!(rec.lists[0].toggle.as_ref().unwrap().label, "Show Less");
    }
    assert_eq!(tracker.storage().writes, writes);

    assert!(!tracker.toggle_list().unwrap());
    let rec = recorder.borrow();
    assert_eq!(rec.lists[1].rows.len(), 3);
    assert_eq!(rec.lists[1].toggle.as_ref().unwrap().label, "Show More");
}

#[test]
fn test_expanded_state_survives_mutations() {
    let mut tracker = tracker();
    for i in 0..4 {
        tracker.add_expense(&format!("item {i}"), 1.0).unwrap();
    }
    tracker.toggle_list().unwrap();
    tracker.add_expense("one more", 1.0).unwrap();
    assert_eq!(tracker.list_view().rows.len(), 5);
}

#[test]
fn test_dispatch_list_actions() {
    let mut tracker = tracker();
    for i in 0..4 {
        tracker.add_expense(&format!("item {i}"), 1.0).unwrap();
    }

    let view = tracker.list_view();
    let toggle = view.toggle.unwrap().action;
    tracker.dispatch(toggle).unwrap();
    assert!(tracker.is_expanded());

    let remove = tracker.list_view().rows[0].remove;
    let ListAction::Remove(id) = remove else {
        panic!("row control should remove, got {remove:?}");
    };
    tracker.dispatch(remove).unwrap();
    assert!(tracker.get_expense(id).is_none());
    assert_eq!(tracker.expense_count(), 3);
    assert!(tracker.list_view().toggle.is_none());
}

#[test]
fn test_chart_presenter_as_observer() {
    let mut tracker = tracker();
    let presenter = Rc::new(RefCell::new(ChartPresenter::new(TextChartSurface::new())));
    tracker.subscribe(Box::new(presenter.clone())).unwrap();
    assert_eq!(presenter.borrow().surface().draw_count(), 1);

    tracker.add_expense("Coffee", 3.5).unwrap();
    tracker.add_expense("Book", 12.0).unwrap();

    let p = presenter.borrow();
    assert_eq!(p.surface().draw_count(), 3);
    let out = p.surface().output().unwrap();
    assert!(out.contains("May 1"));
    assert!(out.contains("15.50"));
}

#[test]
fn test_chart_failure_propagates_from_subscribe() {
    let mut tracker = tracker();
    let result = tracker.subscribe(Box::new(ChartPresenter::new(BrokenCanvas)));
    assert!(matches!(result, Err(CoreError::Chart(_))));
    assert_eq!(tracker.observer_count(), 0);

    let healthy = Rc::new(RefCell::new(ChartPresenter::new(TextChartSurface::new())));
    tracker.subscribe(Box::new(healthy)).unwrap();
    // The broken presenter was never registered, so later mutations succeed.
    assert!(tracker.add_expense("Coffee", 3.5).is_ok());
}

// ═══════════════════════════════════════════════════════════════════
// Form
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_form_clears_after_accepted_submit() {
    let mut tracker = tracker();
    let mut form = ExpenseForm::new("Coffee", "3.5");
    let outcome = form.submit(&mut tracker).unwrap();
    assert!(outcome.is_added());
    assert_eq!(form, ExpenseForm::default());
    assert_eq!(tracker.total(), 3.5);
}

#[test]
fn test_form_keeps_rejected_input() {
    let mut tracker = tracker();
    let mut form = ExpenseForm::new("Coffee", "three");
    let outcome = form.submit(&mut tracker).unwrap();
    assert_eq!(outcome, AddOutcome::Rejected(RejectReason::AmountNotNumeric));
    assert_eq!(form.item, "Coffee");
    assert_eq!(form.amount, "three");
    assert_eq!(tracker.expense_count(), 0);
}

// ═══════════════════════════════════════════════════════════════════
// Export
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_export_rows_oldest_first_without_id() {
    let mut tracker = tracker();
    tracker.add_expense_on("Train", 27.4, d(2024, 3, 2)).unwrap();
    tracker.add_expense_on("Coffee", 3.5, d(2024, 1, 15)).unwrap();
    tracker.add_expense_on("Book", 12.0, d(2024, 2, 10)).unwrap();

    let rows = tracker.export_rows();
    let dates: Vec<String> = rows.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-01-15", "2024-02-10", "2024-03-02"]);

    let json = serde_json::to_value(&rows).unwrap();
    assert!(json.as_array().unwrap().iter().all(|r| r.get("id").is_none()));
}

#[test]
fn test_export_same_day_order_does_not_depend_on_reads() {
    let mut tracker = tracker();
    tracker.add_expense_on("first", 1.0, d(2024, 1, 1)).unwrap();
    tracker.add_expense_on("second", 2.0, d(2024, 1, 1)).unwrap();

    let items = |t: &ExpenseTracker<CountingStorage>| -> Vec<String> {
        t.export_rows().into_iter().map(|r| r.item).collect()
    };
    let before = items(&tracker);
    assert_eq!(before, vec!["second", "first"]);

    let _ = tracker.expenses();
    let _ = tracker.list_view();
    assert_eq!(items(&tracker), before);
}

#[test]
fn test_saved_json_is_newest_first() {
    let mut tracker = tracker();
    tracker.add_expense("Coffee", 3.5).unwrap();
    tracker.add_expense("Book", 12.0).unwrap();

    let raw = tracker.storage().get_item("expenses").unwrap().unwrap();
    let saved: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    let items: Vec<&str> = saved.iter().map(|e| e["item"].as_str().unwrap()).collect();
    assert_eq!(items, vec!["Book", "Coffee"]);
}

#[test]
fn test_exported_file_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = tracker();
    tracker.add_expense_on("Train", 27.4, d(2024, 3, 2)).unwrap();
    tracker.add_expense_on("Coffee", 3.5, d(2024, 1, 15)).unwrap();

    let path = tracker.export_to_dir(dir.path()).unwrap();
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();

    let mut workbook = String::new();
    std::io::Read::read_to_string(&mut archive.by_name("xl/workbook.xml").unwrap(), &mut workbook)
        .unwrap();
    assert!(workbook.contains(r#"<sheet name="Expenses""#));

    let mut strings = String::new();
    std::io::Read::read_to_string(
        &mut archive.by_name("xl/sharedStrings.xml").unwrap(),
        &mut strings,
    )
    .unwrap();
    let order = ["date", "item", "amount", "2024-01-15", "Coffee", "2024-03-02", "Train"]
        .map(|s| strings.find(&format!("<t>{s}</t>")).unwrap());
    assert!(order.windows(2).all(|w| w[0] < w[1]));

    let mut sheet = String::new();
    std::io::Read::read_to_string(
        &mut archive.by_name("xl/worksheets/sheet1.xml").unwrap(),
        &mut sheet,
    )
    .unwrap();
    assert!(sheet.contains(r#"<c r="C2"><v>3.5</v></c>"#));
    assert!(sheet.contains(r#"<c r="C3"><v>27.4</v></c>"#));
}

#[test]
fn test_export_is_read_only() {
    let mut tracker = tracker();
    tracker.add_expense("Coffee", 3.5).unwrap();
    let recorder = recorded(&mut tracker);
    let writes = tracker.storage().writes;

    let bytes = tracker.export_xlsx_bytes().unwrap();
    assert_eq!(&bytes[..4], b"PK\x03\x04");

    assert_eq!(tracker.storage().writes, writes);
    assert_eq!(recorder.borrow().dashboards.len(), 1);
    assert_eq!(tracker.expense_count(), 1);
}

#[test]
fn test_export_to_dir_uses_configured_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = tracker();
    tracker.add_expense("Coffee", 3.5).unwrap();

    let path = tracker.export_to_dir(dir.path()).unwrap();
    assert_eq!(path, dir.path().join("expenses.xlsx"));
    assert!(path.is_file());
}

#[test]
fn test_chart_failure_propagates_from_add() {
    let mut tracker = tracker();
    tracker
        .subscribe(Box::new(Rc::new(RefCell::new(Recorder::default()))))
        .unwrap();

    // Registered while the canvas still worked, then the canvas breaks.
    struct BreaksLater {
        calls: usize,
    }

    impl ExpenseObserver for BreaksLater {
        fn expenses_changed(&mut self, _view: &DashboardView) -> Result<(), CoreError> {
            self.calls += 1;
            if self.calls > 1 {
                return Err(CoreError::Chart("canvas context lost".into()));
            }
            Ok(())
        }
    }

    tracker.subscribe(Box::new(BreaksLater { calls: 0 })).unwrap();
    let result = tracker.add_expense("Coffee", 3.5);
    assert!(matches!(result, Err(CoreError::Chart(_))));
    // The write happened before observers were notified.
    assert_eq!(tracker.storage().writes, 1);
}
