//! Presentation payloads built from an aggregation. Nothing here draws anything, the payloads are
//! handed to a rendering surface.

pub mod charts;

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::{
    aggregate::AggregationResult,
    export::ExportInfo,
    loader::LoadError,
    utils::{
        percentage::{share_percentage, Percentage},
        time::{date_label, date_time_label, parse_timestamp},
    },
};

pub use charts::{ChartKind, ChartSpec, Charts, Dataset};

pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load data file";
pub const EMPTY_MESSAGE: &str = "No activity data found";
/// Shown in place of values that are unknown.
pub const PLACEHOLDER: &str = "-";
pub const DEFAULT_TOP_APPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Number of applications shown on the application chart.
    pub top_apps: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_apps: DEFAULT_TOP_APPS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Hours with 2 decimals.
    pub total_hours: String,
    pub top_app: String,
    pub top_app_hours: String,
    pub distinct_apps: usize,
    /// Date of the first activity.
    pub date: String,
    /// Time of the export, if the exporter recorded it.
    pub last_update: Option<String>,
    pub time_range: Option<ExportRange>,
    /// Number of events the exporter claims to have written.
    pub declared_events: Option<u64>,
    pub activity_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    /// Starts at 1.
    pub rank: usize,
    pub app: String,
    pub hours: String,
    /// Raw hours, for surfaces that do their own formatting.
    pub duration: f64,
    pub share: Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: SummaryStats,
    pub ranking: Vec<RankedRow>,
    pub charts: Charts,
}

/// Final state of a pipeline run as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    LoadFailure { message: String, cause: String },
    Empty { message: String },
    Ready(Report),
}

impl Outcome {
    pub fn load_failure(error: &LoadError) -> Self {
        Outcome::LoadFailure {
            message: LOAD_FAILURE_MESSAGE.into(),
            cause: error.to_string(),
        }
    }

    pub fn empty() -> Self {
        Outcome::Empty {
            message: EMPTY_MESSAGE.into(),
        }
    }
}

pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

/// Builds the report using the local time zone for export times.
pub fn build_report(
    result: &AggregationResult,
    export_info: Option<&ExportInfo>,
    options: &ReportOptions,
) -> Report {
    build_report_in(result, export_info, options, &Local)
}

pub fn build_report_in<Tz: TimeZone>(
    result: &AggregationResult,
    export_info: Option<&ExportInfo>,
    options: &ReportOptions,
    tz: &Tz,
) -> Report
where
    Tz::Offset: std::fmt::Display,
{
    Report {
        summary: summary(result, export_info, tz),
        ranking: ranking(result),
        charts: Charts::new(result, options.top_apps),
    }
}

fn summary<Tz: TimeZone>(
    result: &AggregationResult,
    export_info: Option<&ExportInfo>,
    tz: &Tz,
) -> SummaryStats
where
    Tz::Offset: std::fmt::Display,
{
    let (top_app, top_app_hours) = match result.top_app() {
        Some(top) => (top.app.clone(), format_hours(top.duration)),
        None => (PLACEHOLDER.into(), format_hours(0.)),
    };

    let time_range = export_info
        .and_then(|v| v.time_range.as_ref())
        .map(|range| ExportRange {
            start: range
                .start
                .as_deref()
                .map_or_else(|| PLACEHOLDER.into(), |v| export_time_label(v, tz)),
            end: range
                .end
                .as_deref()
                .map_or_else(|| PLACEHOLDER.into(), |v| export_time_label(v, tz)),
        });

    SummaryStats {
        total_hours: format_hours(result.total_hours),
        top_app,
        top_app_hours,
        distinct_apps: result.distinct_apps,
        date: result
            .first_date
            .map_or_else(|| PLACEHOLDER.into(), date_label),
        last_update: export_info
            .and_then(|v| v.export_time.as_deref())
            .map(|v| export_time_label(v, tz)),
        time_range,
        declared_events: export_info.and_then(|v| v.total_events),
        activity_count: result.activity_count(),
    }
}

/// Times that can't be parsed are shown as written by the exporter.
fn export_time_label<Tz: TimeZone>(value: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match parse_timestamp(value, tz) {
        Some(v) => date_time_label(&v.with_timezone(tz)),
        None => value.to_string(),
    }
}

fn ranking(result: &AggregationResult) -> Vec<RankedRow> {
    result
        .app_usage
        .iter()
        .enumerate()
        .map(|(index, usage)| RankedRow {
            rank: index + 1,
            app: usage.app.clone(),
            hours: format_hours(usage.duration),
            duration: usage.duration,
            share: share_percentage(usage.duration, result.total_hours),
        })
        .collect()
}
