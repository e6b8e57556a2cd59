use rust_xlsxwriter::Workbook;

use crate::errors::CoreError;
use crate::models::expense::Expense;
use crate::models::export::ExportRow;

/// Turns the expense collection into a spreadsheet.
///
/// Read-only with respect to the collection: nothing is persisted and no
/// observer is notified.
pub struct ExportService;

impl ExportService {
    /// Id-less rows sorted by date, oldest first (the reverse of the on-screen
    /// order). Expenses sharing a date keep their relative order.
    #[must_use]
    pub fn rows(expenses: &[Expense]) -> Vec<ExportRow> {
        let mut rows: Vec<ExportRow> = expenses
            .iter()
            .map(|e| ExportRow {
                date: e.date,
                item: e.item.clone(),
                amount: e.amount,
            })
            .collect();
        rows.sort_by_key(|r| r.date);
        tracing::debug!(?rows, "Prepared export rows");
        rows
    }

    /// Encode `rows` as an xlsx workbook with a single sheet named `sheet_name`.
    ///
    /// Returns raw bytes that a frontend can offer as a download.
    pub fn to_xlsx_bytes(rows: &[ExportRow], sheet_name: &str) -> Result<Vec<u8>, CoreError> {
        let mut workbook = Self::build_workbook(rows, sheet_name)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Write the workbook straight to `path` (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn write_xlsx(
        rows: &[ExportRow],
        path: &std::path::Path,
        sheet_name: &str,
    ) -> Result<(), CoreError> {
        let mut workbook = Self::build_workbook(rows, sheet_name)?;
        workbook.save(path)?;
        tracing::info!(path = %path.display(), rows = rows.len(), "Exported expenses");
        Ok(())
    }

    /// Header row from the field names, then one row per expense.
    /// Dates go in as `YYYY-MM-DD` text, amounts as numbers.
    fn build_workbook(rows: &[ExportRow], sheet_name: &str) -> Result<Workbook, CoreError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        for (col, header) in (0u16..).zip(ExportRow::HEADERS) {
            worksheet.write_string(0, col, header)?;
        }

        for (idx, row) in rows.iter().enumerate() {
            let line = u32::try_from(idx + 1).map_err(|_| {
                CoreError::Export(format!("Too many rows to export: {}", rows.len()))
            })?;
            worksheet.write_string(line, 0, row.date.format("%Y-%m-%d").to_string())?;
            worksheet.write_string(line, 1, &row.item)?;
            worksheet.write_number(line, 2, row.amount)?;
        }

        Ok(workbook)
    }
}
