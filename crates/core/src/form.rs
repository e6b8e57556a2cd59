use crate::errors::CoreError;
use crate::models::expense::AddOutcome;
use crate::storage::backend::KeyValueStore;
use crate::ExpenseTracker;

/// The two input fields of the "add expense" form, as raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseForm {
    pub item: String,
    pub amount: String,
}

impl ExpenseForm {
    pub fn new(item: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            amount: amount.into(),
        }
    }

    /// Add the typed expense (dated today). The fields are cleared only when
    /// the expense was accepted, so rejected input stays for correction.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        tracker: &mut ExpenseTracker<S>,
    ) -> Result<AddOutcome, CoreError> {
        let outcome = tracker.add_expense_input(&self.item, &self.amount)?;
        if outcome.is_added() {
            self.clear();
        }
        Ok(outcome)
    }

    pub fn clear(&mut self) {
        self.item.clear();
        self.amount.clear();
    }
}
