use serde::{Deserialize, Serialize};

use super::chart::BarChart;
use super::expense::ExpenseId;

/// A user action a list control triggers when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListAction {
    /// Remove the expense with this id
    Remove(ExpenseId),
    /// Flip between the short preview and the full list
    ToggleExpanded,
}

/// One visible row of the expense list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRow {
    pub id: ExpenseId,

    /// `YYYY-MM-DD`
    pub date: String,

    pub item: String,

    /// Currency-style amount with two decimals, e.g. "$12.00"
    pub amount_label: String,

    /// Label of the per-row removal control
    pub remove_label: String,

    /// Action fired by the removal control
    pub remove: ListAction,
}

/// The "Show More" / "Show Less" control under the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleControl {
    pub label: String,
    pub action: ListAction,
}

/// Complete contents of the expense list, ready to be drawn.
///
/// A frontend clears its list element and appends `rows` (then `toggle`, if any).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListView {
    /// Rows in newest-first order
    pub rows: Vec<ListRow>,

    /// Present only when there are more expenses than the preview shows
    pub toggle: Option<ToggleControl>,

    /// Whether the full list is shown
    pub expanded: bool,
}

/// Snapshot handed to observers after every successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub list: ListView,

    /// Total over all expenses, two decimals, no currency symbol
    pub total_label: String,

    pub chart: BarChart,
}
