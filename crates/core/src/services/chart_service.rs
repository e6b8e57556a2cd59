use std::collections::HashMap;

use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::chart::{BarChart, DailyTotal};
use crate::models::expense::Expense;
use crate::models::settings::ChartStyle;
use crate::models::view::DashboardView;
use crate::presentation::traits::{ChartSurface, ExpenseObserver};

/// Generates the daily totals chart data from the expense collection.
///
/// The core computes all the numbers; the chart surface only draws.
pub struct ChartService;

impl ChartService {
    /// Short month/day bucket label, e.g. "Jan 5". The year is dropped.
    #[must_use]
    pub fn day_label(date: NaiveDate) -> String {
        date.format("%b %-d").to_string()
    }

    /// Sum amounts per day label, oldest day first.
    ///
    /// Buckets are opened in the order labels first appear in `newest_first`
    /// and the sequence is reversed at the end. Dates from different years
    /// that share a label land in the same bucket.
    #[must_use]
    pub fn daily_totals(newest_first: &[Expense]) -> Vec<DailyTotal> {
        let mut buckets: Vec<DailyTotal> = Vec::new();
        let mut index_by_label: HashMap<String, usize> = HashMap::new();

        for expense in newest_first {
            let label = Self::day_label(expense.date);
            match index_by_label.get(&label) {
                Some(&idx) => buckets[idx].total += expense.amount,
                None => {
                    index_by_label.insert(label.clone(), buckets.len());
                    buckets.push(DailyTotal {
                        label,
                        total: expense.amount,
                    });
                }
            }
        }

        buckets.reverse();
        buckets
    }

    /// Full bar chart description for `newest_first`.
    #[must_use]
    pub fn bar_chart(newest_first: &[Expense], style: &ChartStyle) -> BarChart {
        let (labels, values) = Self::daily_totals(newest_first)
            .into_iter()
            .map(|bucket| (bucket.label, bucket.total))
            .unzip();

        BarChart {
            labels,
            values,
            dataset_label: style.dataset_label.clone(),
            background_color: style.background_color.clone(),
            border_color: style.border_color.clone(),
            border_width: style.border_width,
            begin_at_zero: true,
        }
    }
}

/// Keeps exactly one chart alive on a surface.
///
/// Every `render` tears down the previous chart before drawing the new one.
pub struct ChartPresenter<S: ChartSurface> {
    surface: S,
    current: Option<S::Handle>,
}

impl<S: ChartSurface> ChartPresenter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            current: None,
        }
    }

    /// Replace whatever is on the surface with `chart`.
    ///
    /// The old chart is destroyed even if drawing the new one then fails.
    pub fn render(&mut self, chart: &BarChart) -> Result<(), CoreError> {
        if let Some(handle) = self.current.take() {
            self.surface.destroy(handle);
        }
        let handle = self.surface.draw(chart)?;
        self.current = Some(handle);
        Ok(())
    }

    /// Whether a chart is currently drawn.
    #[must_use]
    pub fn has_chart(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: ChartSurface> ExpenseObserver for ChartPresenter<S> {
    fn expenses_changed(&mut self, view: &DashboardView) -> Result<(), CoreError> {
        self.render(&view.chart)
    }
}
