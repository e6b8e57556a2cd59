use serde::{Deserialize, Serialize};

/// Sum of all expenses sharing one short day label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    /// Short month/day label, e.g. "Jan 5" (no year)
    pub label: String,

    /// Sum of the amounts in this bucket
    pub total: f64,
}

/// Everything a chart surface needs to draw the daily totals bar chart.
///
/// The core computes the numbers and styling; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    /// Day labels, oldest first
    pub labels: Vec<String>,

    /// One value per label
    pub values: Vec<f64>,

    /// Series label shown in the legend
    pub dataset_label: String,

    pub background_color: String,
    pub border_color: String,
    pub border_width: u32,

    /// Value axis starts at zero
    pub begin_at_zero: bool,
}

impl BarChart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
