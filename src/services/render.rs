use anyhow::Result;
use std::io::Write;

use crate::series::types::Chart;

/// Consumer of a finished series.
pub trait SeriesRenderer {
    fn render(&mut self, chart: &Chart<'_>) -> Result<()>;
}

/// Writes a chart as an aligned two-column table.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SeriesRenderer for TextRenderer<W> {
    fn render(&mut self, chart: &Chart<'_>) -> Result<()> {
        writeln!(self.out, "{}", chart.title)?;
        if chart.series.is_empty() {
            writeln!(self.out, "(no data points)")?;
            return Ok(());
        }

        writeln!(self.out, "{:<20} {:>14}", chart.x_label, chart.y_label)?;
        for point in &chart.series.points {
            writeln!(self.out, "{:<20} {:>14}", point.at.to_string(), point.value)?;
        }
        if let Some(gain) = chart.series.gain() {
            writeln!(self.out, "Gain: {gain:+}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
