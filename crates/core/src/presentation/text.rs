use crate::errors::CoreError;
use crate::models::chart::BarChart;

use super::traits::ChartSurface;

/// Widest bar, in characters.
const BAR_WIDTH: usize = 40;

/// Draws the bar chart as plain text, one line per day, for terminals and logs.
///
/// Bars are horizontal here; values scale against the largest bucket and the
/// axis always starts at zero.
#[derive(Debug, Default)]
pub struct TextChartSurface {
    output: Option<String>,
    drawn: u64,
}

impl TextChartSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chart currently on screen, if any.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// How many charts have been drawn over the surface's lifetime.
    #[must_use]
    pub fn draw_count(&self) -> u64 {
        self.drawn
    }

    fn format(chart: &BarChart) -> String {
        let mut out = format!("{}\n", chart.dataset_label);
        let label_width = chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max = chart.values.iter().copied().fold(0.0_f64, f64::max);

        for (label, value) in chart.labels.iter().zip(&chart.values) {
            let len = if max > 0.0 {
                ((value / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            out.push_str(&format!(
                "{label:>label_width$} | {} {value:.2}\n",
                "#".repeat(len)
            ));
        }
        out
    }
}

impl ChartSurface for TextChartSurface {
    type Handle = u64;

    fn draw(&mut self, chart: &BarChart) -> Result<Self::Handle, CoreError> {
        if self.output.is_some() {
            return Err(CoreError::Chart(
                "Surface already holds a chart; destroy it first".into(),
            ));
        }
        self.output = Some(Self::format(chart));
        self.drawn += 1;
        Ok(self.drawn)
    }

    fn destroy(&mut self, handle: Self::Handle) {
        if handle == self.drawn {
            self.output = None;
        }
    }
}
