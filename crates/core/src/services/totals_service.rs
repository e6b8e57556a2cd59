/// Formats the running total for display.
pub struct TotalsService;

impl TotalsService {
    /// Exactly two decimals and no currency symbol; the symbol is static
    /// markup around the total, not part of it.
    #[must_use]
    pub fn format_total(total: f64) -> String {
        format!("{total:.2}")
    }
}
