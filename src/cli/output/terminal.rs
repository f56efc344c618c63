use std::io::Write;

use ansi_term::{Colour, Style};
use anyhow::Result;

use crate::{
    report::{ChartKind, ChartSpec, Outcome, Report, PLACEHOLDER},
    utils::{
        percentage::share_percentage,
        time::{format_duration, seconds_to_duration},
    },
};

use super::RenderSurface;

const BAR_WIDTH: usize = 30;
const BAR: &str = "█";

/// Draws the dashboard as plain text. Charts are drawn as horizontal bars.
pub struct TerminalSurface<W> {
    out: W,
    colored: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, colored: bool) -> Self {
        Self { out, colored }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.colored {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&mut self, text: &str) -> Result<()> {
        let text = self.paint(Style::new().bold().underline(), text);
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    fn write_report(&mut self, report: &Report) -> Result<()> {
        let summary = &report.summary;
        self.heading("Activity dashboard")?;
        let last_update = summary.last_update.as_deref().unwrap_or(PLACEHOLDER).to_string();
        let top_app = self.paint(Colour::Green.bold(), &summary.top_app);
        writeln!(self.out, "  Last update     {last_update}")?;
        writeln!(self.out, "  Date            {}", summary.date)?;
        writeln!(self.out, "  Total tracked   {} hours", summary.total_hours)?;
        writeln!(
            self.out,
            "  Top app         {top_app} ({} hours)",
            summary.top_app_hours
        )?;
        writeln!(self.out, "  Distinct apps   {}", summary.distinct_apps)?;
        writeln!(self.out, "  Activities      {}", summary.activity_count)?;
        if let Some(range) = &summary.time_range {
            writeln!(self.out, "  Export range    {} to {}", range.start, range.end)?;
        }
        if let Some(declared) = summary.declared_events {
            writeln!(self.out, "  Exported events {declared}")?;
        }
        writeln!(self.out)?;

        self.heading("Applications")?;
        let app_width = report
            .ranking
            .iter()
            .map(|v| v.app.chars().count())
            .max()
            .unwrap_or(0);
        for row in &report.ranking {
            writeln!(
                self.out,
                "{:>4}. {:<app_width$}  {:>8} hours  {:>10}  {:>6}",
                row.rank,
                row.app,
                row.hours,
                format_duration(seconds_to_duration(row.duration * 3600.)),
                row.share.to_string(),
            )?;
        }

        for chart in report.charts.iter() {
            writeln!(self.out)?;
            self.write_chart(chart)?;
        }
        Ok(())
    }

    fn write_chart(&mut self, chart: &ChartSpec) -> Result<()> {
        self.heading(&chart.title)?;
        let values = &chart.dataset.values;
        let total = values.iter().sum::<f64>();
        // Proportion charts are scaled to the whole, line charts to their peak.
        let scale = match chart.kind {
            ChartKind::Pie | ChartKind::Doughnut => total,
            ChartKind::Line => values.iter().copied().fold(0., f64::max),
        };
        let label_width = chart
            .labels
            .iter()
            .map(|v| v.chars().count())
            .max()
            .unwrap_or(0);

        for (index, (label, value)) in chart.labels.iter().zip(values).enumerate() {
            let length = if scale > 0. {
                (value / scale * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let bar = BAR.repeat(length);
            let bar = match chart.dataset.colors.get(index % chart.dataset.colors.len().max(1)) {
                Some(color) => self.paint(hex_colour(color).normal(), &bar),
                None => bar,
            };
            let figure = match chart.kind {
                ChartKind::Pie | ChartKind::Doughnut => {
                    format!("{value:.2}h {}", share_percentage(*value, total))
                }
                ChartKind::Line => format!("{value:.2}h"),
            };
            let padding = " ".repeat(BAR_WIDTH - length.min(BAR_WIDTH));
            writeln!(
                self.out,
                "  {label:>label_width$} │{bar}{padding} {figure}"
            )?;
        }
        Ok(())
    }
}

/// Converts `#RRGGBB` into a terminal colour. Anything else is drawn white.
fn hex_colour(value: &str) -> Colour {
    let parse = |range: std::ops::Range<usize>| {
        value
            .strip_prefix('#')
            .filter(|v| v.len() == 6)
            .and_then(|v| v.get(range))
            .and_then(|v| u8::from_str_radix(v, 16).ok())
    };
    match (parse(0..2), parse(2..4), parse(4..6)) {
        (Some(r), Some(g), Some(b)) => Colour::RGB(r, g, b),
        _ => Colour::White,
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn render(&mut self, outcome: &Outcome) -> Result<()> {
        match outcome {
            Outcome::LoadFailure { message, cause } => {
                let message = self.paint(Colour::Red.bold(), message);
                writeln!(self.out, "{message}: {cause}")?;
            }
            Outcome::Empty { message } => {
                writeln!(self.out, "{message}")?;
            }
            Outcome::Ready(report) => self.write_report(report)?,
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use ansi_term::Colour;
    use chrono::Utc;

    use super::{hex_colour, TerminalSurface};
    use crate::{
        aggregate::{aggregate_in, Aggregation},
        cli::output::RenderSurface,
        export::RawExport,
        report::{build_report_in, Outcome, ReportOptions, EMPTY_MESSAGE},
    };

    fn render(outcome: &Outcome, colored: bool) -> Result<String> {
        let mut surface = TerminalSurface::new(vec![], colored);
        surface.render(outcome)?;
        Ok(String::from_utf8(surface.into_inner())?)
    }

    fn sample_outcome() -> Result<Outcome> {
        let raw = RawExport::from_slice(
            br#"{"buckets": {"window": {"events": [
                {"data": {"app": "Code"}, "duration": 5400, "timestamp": "2024-01-01T09:00:00Z"},
                {"data": {"app": "Chrome"}, "duration": 1800, "timestamp": "2024-01-01T10:00:00Z"}
            ]}}}"#,
        )?;
        let Aggregation::Ready(result) = aggregate_in(&raw, &Utc) else {
            anyhow::bail!("Expected activities");
        };
        Ok(Outcome::Ready(build_report_in(
            &result,
            None,
            &ReportOptions::default(),
            &Utc,
        )))
    }

    #[test]
    fn renders_report() -> Result<()> {
        let text = render(&sample_outcome()?, false)?;

        assert!(text.contains("Total tracked   2.00 hours"));
        assert!(text.contains("Top app         Code (1.50 hours)"));
        assert!(text.contains("Distinct apps   2"));
        assert!(text.contains("   1. Code"));
        assert!(text.contains("1h30m0s"));
        assert!(text.contains("   2. Chrome"));
        assert!(text.contains("Usage by hour"));
        assert!(text.contains("23:00 │"));
        assert!(text.contains("Productivity"));
        assert!(!text.contains('\u{1b}'));
        Ok(())
    }

    #[test]
    fn colours_only_when_enabled() -> Result<()> {
        let text = render(&sample_outcome()?, true)?;
        assert!(text.contains('\u{1b}'));
        Ok(())
    }

    #[test]
    fn renders_empty_and_failure() -> Result<()> {
        assert_eq!(render(&Outcome::empty(), false)?, format!("{EMPTY_MESSAGE}\n"));

        let failure = Outcome::LoadFailure {
            message: "Failed to load data file".into(),
            cause: "boom".into(),
        };
        assert_eq!(render(&failure, false)?, "Failed to load data file: boom\n");
        Ok(())
    }

    #[test]
    fn parses_hex_colours() {
        assert_eq!(hex_colour("#FF6384"), Colour::RGB(0xFF, 0x63, 0x84));
        assert_eq!(hex_colour("rgba(1, 2, 3, 0.1)"), Colour::White);
        assert_eq!(hex_colour("#FFF"), Colour::White);
    }
}
