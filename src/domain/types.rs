//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built once per acquisition cycle and shared read-only by the filter and
//!   statistics passes
//! - rendered by both the CLI and the TUI
//! - serialized for `--json` output and CSV export

use std::cmp::Ordering;

use clap::ValueEnum;
use serde::{Deserialize, Serialize, Serializer};

/// Sentinel used by filter fields and CLI flags for "no constraint".
pub const ALL: &str = "all";

/// Top-level scope selector governing which series are fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Headline national indicators plus Florida.
    #[default]
    All,
    /// Every national and inflation indicator.
    National,
    /// Both indicators of the selected state.
    States,
}

impl View {
    pub const ALL: [View; 3] = [View::All, View::National, View::States];

    pub fn display_name(self) -> &'static str {
        match self {
            View::All => "All Data",
            View::National => "National",
            View::States => "States",
        }
    }

    pub fn next(self) -> Self {
        match self {
            View::All => View::National,
            View::National => View::States,
            View::States => View::All,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            View::All => View::States,
            View::National => View::All,
            View::States => View::National,
        }
    }
}

/// Catalog category of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Category {
    National,
    Inflation,
    #[serde(rename = "State Data")]
    #[value(name = "state")]
    StateData,
}

impl Category {
    pub fn display_name(self) -> &'static str {
        match self {
            Category::National => "National",
            Category::Inflation => "Inflation",
            Category::StateData => "State Data",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The two fixed indicator families offered as categories under [`View::States`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateIndicator {
    UnemploymentRate,
    NonfarmEmployment,
}

impl StateIndicator {
    pub const ALL: [StateIndicator; 2] =
        [StateIndicator::UnemploymentRate, StateIndicator::NonfarmEmployment];

    /// Label shown as a category option.
    pub fn label(self) -> &'static str {
        match self {
            StateIndicator::UnemploymentRate => "Unemployment rate",
            StateIndicator::NonfarmEmployment => "nonfarm employment",
        }
    }

    /// Fragment every series name of this family contains.
    pub fn name_fragment(self) -> &'static str {
        match self {
            StateIndicator::UnemploymentRate => "Unemployment Rate",
            StateIndicator::NonfarmEmployment => "Total Nonfarm Employment",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ind| ind.label() == label)
    }
}

/// Static metadata identifying and labeling a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesDescriptor {
    /// External series identifier (unique).
    pub id: String,
    /// Display name; also the grouping key, unique per indicator.
    pub name: String,
    pub category: Category,
    /// Finer label; the state name for state series.
    pub subcategory: Option<String>,
    /// Display unit.
    pub unit: String,
}

/// A footnote attached to an observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    pub code: Option<String>,
    pub text: String,
}

/// One observation of a series, with its descriptor fields copied in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub subcategory: Option<String>,
    pub unit: String,

    pub year: i32,
    /// Period code (`M01`..`M12`, `M13` for the annual average).
    pub period: String,
    pub period_name: String,
    /// Parsed value; `None` when the source value is not a finite number.
    pub value: Option<f64>,
    /// Value exactly as the source reported it (display and search).
    pub raw_value: String,
    pub footnotes: Vec<Footnote>,
}

impl DataPoint {
    /// Numeric part of the period code (`M07` -> 7); 0 when there is none.
    pub fn period_number(&self) -> u32 {
        period_number(&self.period)
    }
}

/// Strip any non-numeric prefix from a period code and parse the rest.
pub fn period_number(period: &str) -> u32 {
    period
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .unwrap_or(0)
}

/// Most-recent-first ordering: year descending, then numeric period
/// descending, then period code descending.
pub fn recency_cmp(a: &DataPoint, b: &DataPoint) -> Ordering {
    b.year
        .cmp(&a.year)
        .then_with(|| b.period_number().cmp(&a.period_number()))
        .then_with(|| b.period.cmp(&a.period))
}

/// Display label for a period option (`M01` -> `Month 01`).
pub fn period_label(period: &str) -> String {
    match period.strip_prefix('M') {
        Some(rest) => format!("Month {rest}"),
        None => period.to_string(),
    }
}

/// Parse a source value string into a finite float.
pub fn parse_value(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Current filter values. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterSelection {
    pub category: Option<String>,
    /// A state name under [`View::States`]; ignored elsewhere.
    pub subcategory: Option<String>,
    pub year: Option<String>,
    pub period: Option<String>,
}

impl FilterSelection {
    /// The selection a tab starts with.
    pub fn for_view(view: View) -> Self {
        match view {
            View::States => Self {
                subcategory: Some(crate::data::catalog::DEFAULT_STATE.to_string()),
                ..Self::default()
            },
            View::All | View::National => Self::default(),
        }
    }

    /// The selected state, falling back to the default state.
    pub fn state(&self) -> &str {
        self.subcategory
            .as_deref()
            .unwrap_or(crate::data::catalog::DEFAULT_STATE)
    }
}

/// Map a user-facing filter value (`all` or a concrete value) into a selection field.
pub fn choice(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Distinct values available for each filter field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub subcategories: Vec<String>,
    pub years: Vec<String>,
    pub periods: Vec<String>,
}

/// Descriptive statistics for one series.
///
/// Everything except `total_count` serializes as a two-decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStats {
    pub total_count: usize,
    #[serde(serialize_with = "two_decimals")]
    pub average: f64,
    #[serde(serialize_with = "two_decimals")]
    pub median: f64,
    #[serde(serialize_with = "two_decimals")]
    pub mode: f64,
    #[serde(serialize_with = "two_decimals")]
    pub min: f64,
    #[serde(serialize_with = "two_decimals")]
    pub max: f64,
}

fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(year: i32, period: &str) -> DataPoint {
        DataPoint {
            id: "LNS14000000".to_string(),
            name: "National Unemployment Rate".to_string(),
            category: Category::National,
            subcategory: None,
            unit: "%".to_string(),
            year,
            period: period.to_string(),
            period_name: String::new(),
            value: Some(4.0),
            raw_value: "4.0".to_string(),
            footnotes: Vec::new(),
        }
    }

    #[test]
    fn recency_orders_year_then_period_descending() {
        let mut points = vec![point(2023, "M12"), point(2024, "M02"), point(2024, "M10")];
        points.sort_by(recency_cmp);
        let keys: Vec<_> = points.iter().map(|p| (p.year, p.period.as_str())).collect();
        assert_eq!(keys, vec![(2024, "M10"), (2024, "M02"), (2023, "M12")]);
    }

    #[test]
    fn period_number_strips_prefix() {
        assert_eq!(period_number("M07"), 7);
        assert_eq!(period_number("M13"), 13);
        assert_eq!(period_number("A01"), 1);
        assert_eq!(period_number("Q"), 0);
    }

    #[test]
    fn period_label_expands_month_codes() {
        assert_eq!(period_label("M01"), "Month 01");
        assert_eq!(period_label("A01"), "A01");
    }

    #[test]
    fn parse_value_rejects_placeholders() {
        assert_eq!(parse_value(" 4.1 "), Some(4.1));
        assert_eq!(parse_value("-"), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("NaN"), None);
    }

    #[test]
    fn choice_maps_all_to_none() {
        assert_eq!(choice("all"), None);
        assert_eq!(choice("ALL"), None);
        assert_eq!(choice(""), None);
        assert_eq!(choice("2024"), Some("2024".to_string()));
    }

    #[test]
    fn states_view_defaults_to_florida() {
        let sel = FilterSelection::for_view(View::States);
        assert_eq!(sel.subcategory.as_deref(), Some("Florida"));
        assert_eq!(FilterSelection::default().state(), "Florida");
        assert_eq!(FilterSelection::for_view(View::National), FilterSelection::default());
    }
}
