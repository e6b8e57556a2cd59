pub mod errors;
pub mod form;
pub mod models;
pub mod presentation;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use models::{
    chart::BarChart,
    expense::{AddOutcome, Expense, ExpenseId},
    export::ExportRow,
    settings::Settings,
    view::{DashboardView, ListAction, ListView},
};
use presentation::traits::ExpenseObserver;
use services::{
    chart_service::ChartService,
    expense_service::{Clock, ExpenseStore, SystemClock},
    export_service::ExportService,
    list_service::ListService,
    totals_service::TotalsService,
};
use storage::{backend::KeyValueStore, manager::StorageManager};

use errors::CoreError;

/// Main entry point for the Expense Tracker core library.
///
/// Owns the expense collection, the store it is persisted to, the list's
/// expand/collapse flag and the registered observers. Every successful
/// mutation is written through to storage and then pushed to all observers,
/// in that order.
#[must_use]
pub struct ExpenseTracker<S: KeyValueStore> {
    store: ExpenseStore,
    storage: S,
    settings: Settings,
    /// Whether the list shows everything or only the preview.
    show_all: bool,
    observers: Vec<Box<dyn ExpenseObserver>>,
}

impl<S: KeyValueStore> std::fmt::Debug for ExpenseTracker<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseTracker")
            .field("expenses", &self.store.len())
            .field("settings", &self.settings)
            .field("show_all", &self.show_all)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<S: KeyValueStore> ExpenseTracker<S> {
    /// Load the saved collection from `storage` (empty if there is none or it
    /// is unreadable) and start with the list collapsed.
    pub fn open(storage: S, settings: Settings) -> Self {
        Self::open_with_clock(storage, settings, Box::new(SystemClock))
    }

    /// Like [`open`](Self::open), with a custom source of ids and dates.
    pub fn open_with_clock(storage: S, settings: Settings, clock: Box<dyn Clock>) -> Self {
        let expenses = StorageManager::load(&storage, &settings.storage_key);
        tracing::info!(count = expenses.len(), "Expense tracker opened");
        Self {
            store: ExpenseStore::with_clock(expenses, clock),
            storage,
            settings,
            show_all: false,
            observers: Vec::new(),
        }
    }

    // ── Observers ───────────────────────────────────────────────────

    /// Register an observer and hand it the current dashboard right away,
    /// so a freshly attached frontend starts fully drawn.
    pub fn subscribe(&mut self, mut observer: Box<dyn ExpenseObserver>) -> Result<(), CoreError> {
        let view = self.dashboard();
        observer.expenses_changed(&view)?;
        self.observers.push(observer);
        Ok(())
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ── Expense Management ──────────────────────────────────────────

    /// Add an expense dated today.
    pub fn add_expense(&mut self, item: &str, amount: f64) -> Result<AddOutcome, CoreError> {
        let outcome = self.store.add(item, amount, None);
        self.commit_add(outcome)
    }

    /// Add an expense with an explicit date.
    pub fn add_expense_on(
        &mut self,
        item: &str,
        amount: f64,
        date: NaiveDate,
    ) -> Result<AddOutcome, CoreError> {
        let outcome = self.store.add(item, amount, Some(date));
        self.commit_add(outcome)
    }

    /// Add an expense dated today from raw form text.
    pub fn add_expense_input(&mut self, item: &str, amount: &str) -> Result<AddOutcome, CoreError> {
        let outcome = self.store.add_input(item, amount, None);
        self.commit_add(outcome)
    }

    /// Remove an expense by id. Removing an unknown id changes nothing and is
    /// not an error; the (unchanged) collection is still saved and re-sent.
    pub fn remove_expense(&mut self, id: ExpenseId) -> Result<bool, CoreError> {
        let removed = self.store.remove(id);
        if removed {
            tracing::info!(id, "Expense removed");
        } else {
            tracing::debug!(id, "No expense with this id to remove");
        }
        self.persist()?;
        self.notify_changed()?;
        Ok(removed)
    }

    /// Perform the action behind a list control.
    pub fn dispatch(&mut self, action: ListAction) -> Result<(), CoreError> {
        match action {
            ListAction::Remove(id) => self.remove_expense(id).map(|_| ()),
            ListAction::ToggleExpanded => self.toggle_list().map(|_| ()),
        }
    }

    /// Flip between the short preview and the full list. Only the list is
    /// re-rendered; nothing is persisted. Returns the new state.
    pub fn toggle_list(&mut self) -> Result<bool, CoreError> {
        self.show_all = !self.show_all;
        let list = self.list_view();
        for observer in &mut self.observers {
            observer.list_toggled(&list)?;
        }
        Ok(self.show_all)
    }

    /// Whether the list currently shows every expense.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.show_all
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// All expenses, newest first.
    pub fn expenses(&self) -> &[Expense] {
        self.store.all()
    }

    #[must_use]
    pub fn get_expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.store.get(id)
    }

    #[must_use]
    pub fn expense_count(&self) -> usize {
        self.store.len()
    }

    /// Sum of every expense, regardless of what the list shows.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.store.total()
    }

    /// The total formatted for display, e.g. "15.50".
    #[must_use]
    pub fn total_label(&self) -> String {
        TotalsService::format_total(self.store.total())
    }

    /// The list as it should currently be drawn.
    pub fn list_view(&self) -> ListView {
        ListService::render(self.store.all(), self.show_all, &self.settings)
    }

    /// Daily totals chart, oldest day first.
    pub fn chart(&self) -> BarChart {
        ChartService::bar_chart(self.store.all(), &self.settings.chart)
    }

    /// Everything an observer receives after a mutation.
    pub fn dashboard(&self) -> DashboardView {
        DashboardView {
            list: self.list_view(),
            total_label: self.total_label(),
            chart: self.chart(),
        }
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Id-less rows, oldest date first.
    #[must_use]
    pub fn export_rows(&self) -> Vec<ExportRow> {
        ExportService::rows(self.store.all())
    }

    /// The whole collection as xlsx bytes (for a browser download).
    pub fn export_xlsx_bytes(&self) -> Result<Vec<u8>, CoreError> {
        ExportService::to_xlsx_bytes(&self.export_rows(), &self.settings.export.sheet_name)
    }

    /// Write the workbook into `dir` under the configured file name and
    /// return its path (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn export_to_dir(
        &self,
        dir: impl AsRef<std::path::Path>,
    ) -> Result<std::path::PathBuf, CoreError> {
        let path = dir.as_ref().join(&self.settings.export.file_name);
        ExportService::write_xlsx(&self.export_rows(), &path, &self.settings.export.sheet_name)?;
        Ok(path)
    }

    // ── Settings & Storage ──────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ── Internal ────────────────────────────────────────────────────

    fn commit_add(&mut self, outcome: AddOutcome) -> Result<AddOutcome, CoreError> {
        match &outcome {
            AddOutcome::Added(id) => {
                tracing::info!(id, "Expense added");
                self.persist()?;
                self.notify_changed()?;
            }
            AddOutcome::Rejected(reason) => {
                tracing::debug!(%reason, "Expense input ignored");
            }
        }
        Ok(outcome)
    }

    fn persist(&mut self) -> Result<(), CoreError> {
        StorageManager::save(
            &mut self.storage,
            &self.settings.storage_key,
            self.store.all(),
        )
    }

    fn notify_changed(&mut self) -> Result<(), CoreError> {
        if self.observers.is_empty() {
            return Ok(());
        }
        let view = self.dashboard();
        for observer in &mut self.observers {
            observer.expenses_changed(&view)?;
        }
        Ok(())
    }
}
