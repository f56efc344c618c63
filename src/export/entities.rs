use serde::Deserialize;

use super::lenient;

/// Label used for events that don't specify an application.
pub const UNKNOWN_APP: &str = "Unknown app";
/// Label used for events that don't specify a window title.
pub const UNKNOWN_WINDOW: &str = "Unknown window";

/// The whole export document. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawExport {
    #[serde(default, deserialize_with = "lenient::buckets")]
    pub buckets: Vec<Bucket>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub export_info: Option<ExportInfo>,
}

/// Metadata written by the exporter next to the buckets.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ExportInfo {
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub export_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub time_range: Option<TimeRange>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_events: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TimeRange {
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub start: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub end: Option<String>,
}

/// A named stream of events. `id` is the key the bucket had in the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bucket {
    pub id: String,
    pub kind: Option<String>,
    pub events: Vec<Event>,
}

/// One recorded observation. Events without `data` don't describe any activity and are skipped
/// during aggregation.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Event {
    #[serde(default, deserialize_with = "lenient::event_data")]
    pub data: Option<EventData>,
    /// Duration in seconds. Only finite, non-negative numbers are kept.
    #[serde(default, deserialize_with = "lenient::seconds")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub timestamp: Option<String>,
}

impl Event {
    pub fn duration_or_default(&self) -> f64 {
        self.duration.unwrap_or(0.)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EventData {
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub app: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub title: Option<String>,
}

impl EventData {
    pub fn app_or_default(&self) -> &str {
        self.app.as_deref().unwrap_or(UNKNOWN_APP)
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_WINDOW)
    }
}
