use crate::models::expense::Expense;
use crate::models::settings::Settings;
use crate::models::view::{ListAction, ListRow, ListView, ToggleControl};

pub const SHOW_MORE_LABEL: &str = "Show More";
pub const SHOW_LESS_LABEL: &str = "Show Less";
pub const REMOVE_LABEL: &str = "Remove";

/// Builds the visible expense list: a short preview of the newest entries,
/// or everything once expanded.
pub struct ListService;

impl ListService {
    /// Render `newest_first` (as returned by `ExpenseStore::all`).
    ///
    /// Collapsed shows the first `settings.preview_len` rows; the toggle
    /// control only exists when there is more than that to show.
    #[must_use]
    pub fn render(newest_first: &[Expense], show_all: bool, settings: &Settings) -> ListView {
        let shown = if show_all {
            newest_first
        } else {
            &newest_first[..newest_first.len().min(settings.preview_len)]
        };

        let rows = shown
            .iter()
            .map(|e| Self::row(e, &settings.currency_symbol))
            .collect();

        let toggle = (newest_first.len() > settings.preview_len).then(|| ToggleControl {
            label: (if show_all { SHOW_LESS_LABEL } else { SHOW_MORE_LABEL }).to_string(),
            action: ListAction::ToggleExpanded,
        });

        ListView {
            rows,
            toggle,
            expanded: show_all,
        }
    }

    /// Currency-style amount, e.g. `$3.50`.
    #[must_use]
    pub fn format_amount(amount: f64, currency_symbol: &str) -> String {
        format!("{currency_symbol}{amount:.2}")
    }

    fn row(expense: &Expense, currency_symbol: &str) -> ListRow {
        ListRow {
            id: expense.id,
            date: expense.date.format("%Y-%m-%d").to_string(),
            item: expense.item.clone(),
            amount_label: Self::format_amount(expense.amount, currency_symbol),
            remove_label: REMOVE_LABEL.to_string(),
            remove: ListAction::Remove(expense.id),
        }
    }
}
