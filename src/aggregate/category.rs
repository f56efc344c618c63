use std::fmt::Display;

use super::AppUsage;

/// Productivity categories in the order they are tested. [Category::Other] is the catch-all and
/// has no matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Productivity,
    Communication,
    Browser,
    Entertainment,
    Other,
}

/// Ordered list of categories with the application name fragments that select them. The first
/// category with a matching fragment wins. Matching is a case-sensitive substring test.
pub const CATEGORY_RULES: [(Category, &[&str]); 4] = [
    (
        Category::Productivity,
        &[
            "Code",
            "Visual Studio Code",
            "Sublime Text",
            "IntelliJ IDEA",
            "Terminal",
            "命令行",
        ],
    ),
    (
        Category::Communication,
        &[
            "Slack",
            "Discord",
            "微信",
            "QQ",
            "Telegram",
            "Microsoft Teams",
        ],
    ),
    (Category::Browser, &["Chrome", "Firefox", "Safari", "Edge"]),
    (
        Category::Entertainment,
        &["Steam", "Spotify", "Netflix", "YouTube", "游戏"],
    ),
];

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Productivity,
        Category::Communication,
        Category::Browser,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Productivity => "Productivity",
            Category::Communication => "Communication",
            Category::Browser => "Browser",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    /// Colour used when drawing the category on a chart.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Productivity => "#4BC0C0",
            Category::Communication => "#FF6384",
            Category::Browser => "#FFCE56",
            Category::Entertainment => "#36A2EB",
            Category::Other => "#9966FF",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub fn categorize(app: &str) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|fragment| app.contains(fragment)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// Hours spent per category.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryUsage {
    totals: [f64; 5],
}

impl CategoryUsage {
    pub fn from_apps(apps: &[AppUsage]) -> Self {
        let totals = apps.iter().fold([0.; 5], |mut totals, usage| {
            totals[categorize(&usage.app).index()] += usage.duration;
            totals
        });
        Self { totals }
    }

    pub fn get(&self, category: Category) -> f64 {
        self.totals[category.index()]
    }

    /// Categories with their hours in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.iter().map(|v| (*v, self.get(*v)))
    }

    pub fn total(&self) -> f64 {
        self.totals.iter().sum()
    }
}
