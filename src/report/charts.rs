use serde::Serialize;

use crate::aggregate::{AggregationResult, Category, CategoryUsage, HourlyUsage};

/// Colours of the application chart. Used in a cycle when more apps are shown.
pub const APP_PALETTE: [&str; 8] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#FF6384", "#C9CBCF",
];

pub const HOURLY_COLOR: &str = "#36A2EB";
pub const HOURLY_FILL: &str = "rgba(54, 162, 235, 0.1)";
pub const HOURLY_LABEL: &str = "Usage time (hours)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Proportions of a whole.
    Pie,
    /// Values over time.
    Line,
    /// Proportions of a whole with a hole in the middle.
    Doughnut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: Option<String>,
    /// Hours.
    pub values: Vec<f64>,
    pub colors: Vec<String>,
    pub fill: Option<String>,
}

/// Everything a rendering surface needs to draw a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub dataset: Dataset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub apps: ChartSpec,
    pub hourly: ChartSpec,
    pub categories: ChartSpec,
}

impl Charts {
    pub fn new(result: &AggregationResult, top_apps: usize) -> Self {
        Self {
            apps: app_chart(result, top_apps),
            hourly: hourly_chart(&result.hourly),
            categories: category_chart(&result.categories),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartSpec> {
        [&self.apps, &self.hourly, &self.categories].into_iter()
    }
}

fn app_chart(result: &AggregationResult, top_apps: usize) -> ChartSpec {
    let apps = result.app_usage.iter().take(top_apps);
    ChartSpec {
        kind: ChartKind::Pie,
        title: "Application usage".into(),
        labels: apps.clone().map(|v| v.app.clone()).collect(),
        dataset: Dataset {
            label: None,
            values: apps.clone().map(|v| v.duration).collect(),
            colors: APP_PALETTE
                .iter()
                .cycle()
                .take(apps.count())
                .map(|v| v.to_string())
                .collect(),
            fill: None,
        },
    }
}

/// All 24 hours are always present, even the ones without usage.
fn hourly_chart(hourly: &HourlyUsage) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        title: "Usage by hour".into(),
        labels: (0..hourly.as_slice().len())
            .map(|hour| format!("{hour}:00"))
            .collect(),
        dataset: Dataset {
            label: Some(HOURLY_LABEL.into()),
            values: hourly.as_slice().to_vec(),
            colors: vec![HOURLY_COLOR.into()],
            fill: Some(HOURLY_FILL.into()),
        },
    }
}

fn category_chart(categories: &CategoryUsage) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Doughnut,
        title: "Productivity".into(),
        labels: Category::ALL.iter().map(|v| v.label().to_string()).collect(),
        dataset: Dataset {
            label: None,
            values: categories.iter().map(|(_, hours)| hours).collect(),
            colors: Category::ALL.iter().map(|v| v.color().to_string()).collect(),
            fill: None,
        },
    }
}
