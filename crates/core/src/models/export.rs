use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An expense as it appears in the exported workbook: the id is dropped.
///
/// Field order here is the column order of the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub item: String,
    pub amount: f64,
}

impl ExportRow {
    /// Column headers, derived from the field names.
    pub const HEADERS: [&'static str; 3] = ["date", "item", "amount"];
}
