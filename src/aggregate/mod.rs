//! Turns an export into usage statistics.
//! The pipeline is a single pass over flattened [Activity] values:
//!   - Events are flattened in bucket order, then in event order. Events without data are dropped.
//!   - Activities are grouped by application and sorted by time spent.
//!   - Hours of the day and productivity categories are accumulated from the same values.

pub mod category;
pub mod hourly;

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use tracing::{debug, info, instrument, warn};

use crate::{export::RawExport, utils::time::parse_timestamp};

pub use category::{categorize, Category, CategoryUsage};
pub use hourly::HourlyUsage;

const SECONDS_IN_HOUR: f64 = 3600.;

/// Normalized view of one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub app: String,
    pub title: String,
    /// Seconds, never negative.
    pub duration: f64,
    /// `None` when the event had no timestamp or it couldn't be parsed.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Activity {
    pub fn hours(&self) -> f64 {
        self.duration / SECONDS_IN_HOUR
    }
}

/// Time spent in one application, in hours.
#[derive(Debug, Clone, PartialEq)]
pub struct AppUsage {
    pub app: String,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// The export had no activity. This is not an error.
    Empty,
    Ready(AggregationResult),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    activities: Vec<Activity>,
    /// Hours across every activity.
    pub total_hours: f64,
    /// Sorted by duration, longest first. Equal durations keep the order apps were first seen in.
    pub app_usage: Vec<AppUsage>,
    pub distinct_apps: usize,
    /// Date of the first activity in document order. This is not necessarily the earliest date,
    /// because exports don't guarantee chronological order.
    pub first_date: Option<NaiveDate>,
    pub hourly: HourlyUsage,
    pub categories: CategoryUsage,
}

impl AggregationResult {
    /// Application with the most time spent. Always present for a non empty aggregation.
    pub fn top_app(&self) -> Option<&AppUsage> {
        self.app_usage.first()
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }
}

/// Aggregates using the local time zone of the machine.
pub fn aggregate(raw: &RawExport) -> Aggregation {
    aggregate_in(raw, &Local)
}

/// Aggregates an export. Hours of the day and dates are computed in `tz`.
#[instrument(skip(raw, tz))]
pub fn aggregate_in<Tz: TimeZone>(raw: &RawExport, tz: &Tz) -> Aggregation {
    let activities = flatten(raw, tz);
    info!("Extracted {} activities", activities.len());

    if activities.is_empty() {
        return Aggregation::Empty;
    }

    let unreadable = activities.iter().filter(|v| v.timestamp.is_none()).count();
    if unreadable > 0 {
        warn!("{unreadable} activities have no readable timestamp and are left out of hourly usage");
    }

    let total_hours = seconds_to_hours(activities.iter().map(|v| v.duration).sum());
    let app_usage = group_by_app(&activities);
    let distinct_apps = app_usage.len();
    let first_date = activities[0]
        .timestamp
        .map(|v| v.with_timezone(tz).date_naive());
    let hourly = HourlyUsage::from_activities(&activities, tz);
    let categories = CategoryUsage::from_apps(&app_usage);

    debug!("Total {total_hours:.2}h across {distinct_apps} apps");

    Aggregation::Ready(AggregationResult {
        activities,
        total_hours,
        app_usage,
        distinct_apps,
        first_date,
        hourly,
        categories,
    })
}

/// Flattens buckets into activities, applying defaults for missing values.
pub fn flatten<Tz: TimeZone>(raw: &RawExport, tz: &Tz) -> Vec<Activity> {
    raw.buckets
        .iter()
        .flat_map(|bucket| bucket.events.iter())
        .filter_map(|event| {
            let data = event.data.as_ref()?;
            Some(Activity {
                app: data.app_or_default().to_string(),
                title: data.title_or_default().to_string(),
                duration: event.duration_or_default(),
                timestamp: event
                    .timestamp
                    .as_deref()
                    .and_then(|v| parse_timestamp(v, tz)),
            })
        })
        .collect()
}

/// Sums that overflow are kept at the largest finite value, so shares stay finite.
fn seconds_to_hours(seconds: f64) -> f64 {
    let seconds = if seconds.is_finite() { seconds } else { f64::MAX };
    seconds / SECONDS_IN_HOUR
}

/// Sums durations per application. The result is sorted with a stable sort, so ties keep the
/// order in which applications first appeared.
pub fn group_by_app(activities: &[Activity]) -> Vec<AppUsage> {
    let mut positions = HashMap::<&str, usize>::new();
    let mut seconds: Vec<(&str, f64)> = vec![];

    for activity in activities {
        let position = *positions.entry(activity.app.as_str()).or_insert_with(|| {
            seconds.push((activity.app.as_str(), 0.));
            seconds.len() - 1
        });
        seconds[position].1 += activity.duration;
    }

    let mut usages = seconds
        .into_iter()
        .map(|(app, seconds)| AppUsage {
            app: app.to_string(),
            duration: seconds_to_hours(seconds),
        })
        .collect::<Vec<_>>();
    usages.sort_by(|a, b| b.duration.total_cmp(&a.duration));
    usages
}
