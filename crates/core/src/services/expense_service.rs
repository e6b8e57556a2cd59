use chrono::{NaiveDate, Utc};

use crate::models::expense::{AddOutcome, Expense, ExpenseId, RejectReason};

/// Source of "now" for id generation and default dates.
pub trait Clock {
    /// Current instant in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;

    /// Today's calendar date.
    fn today(&self) -> NaiveDate;
}

/// Wall clock in UTC, matching an ISO `YYYY-MM-DD` date of the current instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Owns the in-memory expense collection: add, remove and totals.
///
/// Pure business logic, no I/O. Persistence and re-rendering are the
/// caller's job (see `ExpenseTracker`).
pub struct ExpenseStore {
    /// Always newest first (descending id).
    expenses: Vec<Expense>,
    clock: Box<dyn Clock>,
    /// Highest id handed out or loaded so far.
    last_id: Option<ExpenseId>,
}

impl ExpenseStore {
    pub fn new(expenses: Vec<Expense>) -> Self {
        Self::with_clock(expenses, Box::new(SystemClock))
    }

    pub fn with_clock(mut expenses: Vec<Expense>, clock: Box<dyn Clock>) -> Self {
        expenses.sort_by(|a, b| b.id.cmp(&a.id));
        let last_id = expenses.iter().map(|e| e.id).max();
        Self {
            expenses,
            clock,
            last_id,
        }
    }

    /// Add an expense dated `date`, or today when `None`.
    ///
    /// Invalid input leaves the collection untouched and reports why. The
    /// item is stored as typed; surrounding whitespace only matters for the
    /// emptiness check.
    pub fn add(&mut self, item: &str, amount: f64, date: Option<NaiveDate>) -> AddOutcome {
        if item.trim().is_empty() {
            return AddOutcome::Rejected(RejectReason::EmptyItem);
        }
        if !amount.is_finite() || amount <= 0.0 {
            return AddOutcome::Rejected(RejectReason::AmountNotPositive);
        }

        let id = self.next_id();
        let date = date.unwrap_or_else(|| self.clock.today());
        // New ids are above every stored one, so the front keeps the order.
        self.expenses.insert(0, Expense::new(id, date, item, amount));
        AddOutcome::Added(id)
    }

    /// Add an expense from raw form text, e.g. `("Coffee", "3.50")`.
    pub fn add_input(&mut self, item: &str, amount: &str, date: Option<NaiveDate>) -> AddOutcome {
        if item.trim().is_empty() {
            return AddOutcome::Rejected(RejectReason::EmptyItem);
        }
        match parse_amount(amount) {
            Some(value) => self.add(item, value, date),
            None => AddOutcome::Rejected(RejectReason::AmountNotNumeric),
        }
    }

    /// Remove the expense with `id`. Returns `false` if there was none.
    pub fn remove(&mut self, id: ExpenseId) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        self.expenses.len() != before
    }

    /// Sum of all amounts; `0.0` for an empty collection.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.expenses.iter().fold(0.0, |acc, e| acc + e.amount)
    }

    /// All expenses, newest first.
    #[must_use]
    pub fn all(&self) -> &[Expense] {
        &self.expenses
    }

    #[must_use]
    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Millisecond timestamp, pushed past the last id when the clock has not
    /// moved (or went backwards) since the previous add.
    fn next_id(&mut self) -> ExpenseId {
        let now = self.clock.now_millis();
        let id = match self.last_id {
            Some(last) if now <= last => last.saturating_add(1),
            _ => now,
        };
        self.last_id = Some(id);
        id
    }
}

/// Read an amount typed into a form field. Surrounding whitespace is ignored.
#[must_use]
pub fn parse_amount(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

