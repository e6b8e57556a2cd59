use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of an expense: milliseconds since the Unix epoch at creation,
/// bumped forward when needed so it stays strictly increasing.
pub type ExpenseId = i64;

/// A single spending entry.
///
/// Records are never edited in place. They are created by the tracker's add
/// operation and destroyed by remove. Field names are the persisted JSON keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Creation key, used for newest-first ordering and removal
    pub id: ExpenseId,

    /// Calendar date of the expense, stored as `YYYY-MM-DD`
    pub date: NaiveDate,

    /// What the money was spent on (never empty)
    pub item: String,

    /// Amount spent (always positive)
    pub amount: f64,
}

impl Expense {
    pub fn new(id: ExpenseId, date: NaiveDate, item: impl Into<String>, amount: f64) -> Self {
        Self {
            id,
            date,
            item: item.into(),
            amount,
        }
    }
}

/// Result of an add attempt.
///
/// Invalid input is a normal outcome, not an error: the collection is left
/// untouched and nothing is persisted or re-rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The expense was stored under this id
    Added(ExpenseId),
    /// The input was ignored
    Rejected(RejectReason),
}

impl AddOutcome {
    #[must_use]
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }

    /// The new id, if the expense was accepted.
    #[must_use]
    pub fn id(&self) -> Option<ExpenseId> {
        match self {
            AddOutcome::Added(id) => Some(*id),
            AddOutcome::Rejected(_) => None,
        }
    }
}

/// Why an add attempt was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Item label was empty or only whitespace
    EmptyItem,
    /// Amount text could not be read as a number
    AmountNotNumeric,
    /// Amount was zero, negative, NaN or infinite
    AmountNotPositive,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::EmptyItem => write!(f, "item must not be empty"),
            RejectReason::AmountNotNumeric => write!(f, "amount is not a number"),
            RejectReason::AmountNotPositive => write!(f, "amount must be greater than zero"),
        }
    }
}
