use std::{fmt::Display, io, process::ExitCode};

use anyhow::Result;
use clap::{builder::TypedValueParser, Parser, ValueEnum};
use tracing::{error, info, instrument};

use crate::{
    aggregate::{aggregate, Aggregation},
    loader::{load_export, ExportLocation, ExportSource, DEFAULT_EXPORT_FILE},
    report::{build_report, Outcome, ReportOptions, DEFAULT_TOP_APPS},
};

use super::output::{json::JsonSurface, terminal::TerminalSurface, RenderSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct DashboardCommand {
    #[arg(
        default_value = DEFAULT_EXPORT_FILE,
        help = "Export to show. Either a path or an http(s) URL"
    )]
    source: String,
    #[arg(long, default_value_t = OutputFormat::Text, help = "How the dashboard is printed")]
    format: OutputFormat,
    #[arg(long, help = "Indent JSON output")]
    pretty: bool,
    #[arg(
        long = "top",
        default_value_t = DEFAULT_TOP_APPS,
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from),
        help = "Number of applications shown on the application chart"
    )]
    top_apps: usize,
    #[arg(long = "no-color", help = "Disable colours in text output")]
    no_color: bool,
}

/// Which way a pipeline run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    LoadFailed,
    Empty,
    Rendered,
}

impl PipelineStatus {
    /// Only a failed load is reported as a failure. Empty data is a normal result.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            PipelineStatus::LoadFailed => ExitCode::FAILURE,
            PipelineStatus::Empty | PipelineStatus::Rendered => ExitCode::SUCCESS,
        }
    }
}

/// Command to process the dashboard. Loads the export once and prints the result.
pub async fn process_dashboard_command(
    DashboardCommand {
        source,
        format,
        pretty,
        top_apps,
        no_color,
    }: DashboardCommand,
) -> Result<PipelineStatus> {
    let location = ExportLocation::parse(&source);
    let options = ReportOptions { top_apps };
    info!("Showing dashboard for {location}");

    let stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => {
            let mut surface = TerminalSurface::new(stdout, !no_color);
            run_pipeline(&location, &mut surface, &options).await
        }
        OutputFormat::Json => {
            let mut surface = JsonSurface::new(stdout, pretty);
            run_pipeline(&location, &mut surface, &options).await
        }
    }
}

/// Loads, aggregates and reports. A failed load stops the pipeline before any aggregation.
#[instrument(skip_all)]
pub async fn run_pipeline(
    source: &impl ExportSource,
    surface: &mut impl RenderSurface,
    options: &ReportOptions,
) -> Result<PipelineStatus> {
    let raw = match load_export(source).await {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to load data {e:?}");
            surface.render(&Outcome::load_failure(&e))?;
            return Ok(PipelineStatus::LoadFailed);
        }
    };

    let (outcome, status) = match aggregate(&raw) {
        Aggregation::Empty => (Outcome::empty(), PipelineStatus::Empty),
        Aggregation::Ready(result) => (
            Outcome::Ready(build_report(&result, raw.export_info.as_ref(), options)),
            PipelineStatus::Rendered,
        ),
    };
    surface.render(&outcome)?;
    Ok(status)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use anyhow::{anyhow, Result};
    use clap::Parser;

    use super::{run_pipeline, DashboardCommand, OutputFormat, PipelineStatus};
    use crate::{
        cli::output::{terminal::TerminalSurface, MockRenderSurface},
        loader::{ExportSource, LoadError},
        report::{Outcome, ReportOptions, LOAD_FAILURE_MESSAGE},
        utils::logging::TEST_LOGGING,
    };

    /// Source with fixed contents. `None` behaves like a missing file.
    struct StaticSource(Option<&'static str>);

    impl ExportSource for StaticSource {
        async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
            match self.0 {
                Some(v) => Ok(v.as_bytes().to_vec()),
                None => Err(LoadError::Io {
                    path: PathBuf::from("activitywatch_data.json"),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            }
        }
    }

    const SAMPLE: &str = r#"{"buckets": {"aw-watcher-window_host": {"events": [
        {"data": {"app": "Code", "title": "main.rs"}, "duration": 3600, "timestamp": "2024-01-01T10:00:00Z"},
        {"data": {"app": "Chrome", "title": "docs"}, "duration": 1800, "timestamp": "2024-01-01T11:00:00Z"}
    ]}}, "export_info": {"export_time": "2024-01-01T12:00:00Z"}}"#;

    #[tokio::test]
    async fn load_failure_is_rendered_once() -> Result<()> {
        *TEST_LOGGING;
        let mut surface = MockRenderSurface::new();
        surface
            .expect_render()
            .withf(|outcome| {
                matches!(outcome, Outcome::LoadFailure { message, .. } if message == LOAD_FAILURE_MESSAGE)
            })
            .times(1)
            .returning(|_| Ok(()));

        let status = run_pipeline(&StaticSource(None), &mut surface, &ReportOptions::default()).await?;
        assert_eq!(status, PipelineStatus::LoadFailed);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_document_is_load_failure() -> Result<()> {
        let mut surface = MockRenderSurface::new();
        surface
            .expect_render()
            .withf(|outcome| matches!(outcome, Outcome::LoadFailure { cause, .. } if cause.starts_with("failed to parse")))
            .times(1)
            .returning(|_| Ok(()));

        let status = run_pipeline(
            &StaticSource(Some("{\"buckets\": [")),
            &mut surface,
            &ReportOptions::default(),
        )
        .await?;
        assert_eq!(status, PipelineStatus::LoadFailed);
        Ok(())
    }

    #[tokio::test]
    async fn empty_export_is_not_a_failure() -> Result<()> {
        let mut surface = MockRenderSurface::new();
        surface
            .expect_render()
            .withf(|outcome| matches!(outcome, Outcome::Empty { .. }))
            .times(1)
            .returning(|_| Ok(()));

        let status = run_pipeline(
            &StaticSource(Some(r#"{"buckets": {}}"#)),
            &mut surface,
            &ReportOptions::default(),
        )
        .await?;
        assert_eq!(status, PipelineStatus::Empty);
        Ok(())
    }

    #[tokio::test]
    async fn report_is_rendered() -> Result<()> {
        let mut surface = MockRenderSurface::new();
        surface
            .expect_render()
            .withf(|outcome| match outcome {
                Outcome::Ready(report) => {
                    report.summary.top_app == "Code"
                        && report.summary.total_hours == "1.50"
                        && report.ranking.len() == 2
                        && report.charts.apps.labels.len() == 1
                }
                _ => false,
            })
            .times(1)
            .returning(|_| Ok(()));

        let status = run_pipeline(
            &StaticSource(Some(SAMPLE)),
            &mut surface,
            &ReportOptions { top_apps: 1 },
        )
        .await?;
        assert_eq!(status, PipelineStatus::Rendered);
        Ok(())
    }

    #[tokio::test]
    async fn surface_errors_are_propagated() -> Result<()> {
        let mut surface = MockRenderSurface::new();
        surface
            .expect_render()
            .returning(|_| Err(anyhow!("surface is gone")));

        let result = run_pipeline(
            &StaticSource(Some(SAMPLE)),
            &mut surface,
            &ReportOptions::default(),
        )
        .await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn renders_to_terminal() -> Result<()> {
        let mut surface = TerminalSurface::new(vec![], false);
        run_pipeline(
            &StaticSource(Some(SAMPLE)),
            &mut surface,
            &ReportOptions::default(),
        )
        .await?;
        let text = String::from_utf8(surface.into_inner())?;
        assert!(text.contains("   1. Code"));
        assert!(text.contains("   2. Chrome"));
        Ok(())
    }

    #[test]
    fn parses_arguments() {
        let command = DashboardCommand::parse_from(["dashboard"]);
        assert_eq!(command.source, "activitywatch_data.json");
        assert_eq!(command.format, OutputFormat::Text);
        assert_eq!(command.top_apps, 8);

        let command = DashboardCommand::parse_from([
            "dashboard",
            "http://localhost:8000/data.json",
            "--format",
            "json",
            "--top",
            "3",
            "--pretty",
        ]);
        assert_eq!(command.source, "http://localhost:8000/data.json");
        assert_eq!(command.format, OutputFormat::Json);
        assert_eq!(command.top_apps, 3);
        assert!(command.pretty);

        assert!(DashboardCommand::try_parse_from(["dashboard", "--top", "0"]).is_err());
    }
}
