use serde::{Deserialize, Serialize};

/// Tracker configuration. Every field has a default, so a host may
/// deserialize a partial JSON object (or nothing at all).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key of the single persisted slot in the key-value store.
    pub storage_key: String,

    /// Number of most recent expenses shown while the list is collapsed.
    pub preview_len: usize,

    /// Prefix used for amounts on list rows (the total carries no symbol).
    pub currency_symbol: String,

    /// Fixed look of the daily totals bar chart.
    pub chart: ChartStyle,

    /// Workbook file and sheet naming.
    pub export: ExportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: "expenses".to_string(),
            preview_len: 3,
            currency_symbol: "$".to_string(),
            chart: ChartStyle::default(),
            export: ExportSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub dataset_label: String,
    pub background_color: String,
    pub border_color: String,
    pub border_width: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            dataset_label: "Expenses".to_string(),
            background_color: "#4cae4c".to_string(),
            border_color: "#5cb85c".to_string(),
            border_width: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub file_name: String,
    pub sheet_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: "expenses.xlsx".to_string(),
            sheet_name: "Expenses".to_string(),
        }
    }
}
