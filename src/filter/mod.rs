//! Filtering and search over acquired records.
//!
//! Both passes are pure functions of their inputs, so callers can recompute
//! them on every selection change.

use std::collections::{HashMap, HashSet};

use crate::domain::{
    Category, DataPoint, FilterOptions, FilterSelection, StateIndicator, View, recency_cmp,
};

/// Maximum records kept per series name.
pub const PER_SERIES_LIMIT: usize = 5;

/// Suffix stripped from state series names to form subcategory options.
const STATE_NAME_SUFFIX: &str = " Unemployment Rate";

/// Series whose presence marks the headline view as complete.
pub const CORE_SERIES: [&str; 3] = [
    "National Unemployment Rate",
    "Consumer Price Index",
    "Producer Price Index",
];

/// Distinct values available for each filter field, in first-seen order.
pub fn compute_options(records: &[DataPoint], view: View) -> FilterOptions {
    let categories = match view {
        View::States => StateIndicator::ALL
            .iter()
            .map(|ind| ind.label().to_string())
            .collect(),
        View::All | View::National => distinct(records.iter().map(|r| r.category.display_name())),
    };

    let subcategories = distinct(
        records
            .iter()
            .filter(|r| r.category == Category::StateData)
            .map(|r| r.name.strip_suffix(STATE_NAME_SUFFIX).unwrap_or(&r.name)),
    );

    let years = distinct_owned(records.iter().map(|r| r.year.to_string()));
    let periods = distinct(records.iter().map(|r| r.period.as_str()));

    FilterOptions {
        categories,
        subcategories,
        years,
        periods,
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

fn distinct_owned(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(v.clone())).collect()
}

/// Records passing the selection and search, most recent first, at most
/// [`PER_SERIES_LIMIT`] per series name.
///
/// Groups keep the order in which their names first appear after sorting.
pub fn apply(
    records: &[DataPoint],
    view: View,
    selection: &FilterSelection,
    search: &str,
) -> Vec<DataPoint> {
    let query = search.to_lowercase();

    let mut passing: Vec<&DataPoint> = records
        .iter()
        .filter(|r| matches_search(r, &query))
        .filter(|r| matches_category(r, view, selection.category.as_deref()))
        .filter(|r| matches_subcategory(r, view, selection.subcategory.as_deref()))
        .filter(|r| exact(selection.year.as_deref(), &r.year.to_string()))
        .filter(|r| exact(selection.period.as_deref(), &r.period))
        .collect();

    passing.sort_by(|a, b| recency_cmp(a, b));

    let mut group_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&DataPoint>> = HashMap::new();
    for record in passing {
        let group = groups.entry(record.name.as_str()).or_insert_with(|| {
            group_order.push(record.name.as_str());
            Vec::new()
        });
        if group.len() < PER_SERIES_LIMIT {
            group.push(record);
        }
    }

    group_order
        .into_iter()
        .filter_map(|name| groups.remove(name))
        .flatten()
        .cloned()
        .collect()
}

/// Empty query, or the query and one of name / raw value / period name /
/// year contain each other (case-insensitive). `query` must be lowercased.
/// Only a truly empty query passes everything; whitespace is searched for.
fn matches_search(record: &DataPoint, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let year = record.year.to_string();
    [
        record.name.as_str(),
        record.raw_value.as_str(),
        record.period_name.as_str(),
        year.as_str(),
    ]
    .into_iter()
    .map(|field| field.trim().to_lowercase())
    .any(|field| field.contains(query) || (!field.is_empty() && query.contains(&field)))
}

fn matches_category(record: &DataPoint, view: View, category: Option<&str>) -> bool {
    let Some(category) = category else {
        return true;
    };
    match view {
        View::States => match StateIndicator::from_label(category) {
            Some(indicator) => record.name.contains(indicator.name_fragment()),
            None => true,
        },
        View::All | View::National => record.category.display_name() == category,
    }
}

fn matches_subcategory(record: &DataPoint, view: View, subcategory: Option<&str>) -> bool {
    match (view, subcategory) {
        (View::States, Some(state)) => record.name.starts_with(state),
        _ => true,
    }
}

fn exact(selected: Option<&str>, value: &str) -> bool {
    selected.is_none_or(|s| s == value)
}

/// Whether every headline series has at least one record.
pub fn core_series_loaded(records: &[DataPoint]) -> bool {
    CORE_SERIES
        .iter()
        .all(|name| records.iter().any(|r| r.name.contains(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, category: Category, year: i32, period: &str, value: &str) -> DataPoint {
        DataPoint {
            id: format!("ID-{name}"),
            name: name.to_string(),
            category,
            subcategory: None,
            unit: "%".to_string(),
            year,
            period: period.to_string(),
            period_name: crate::domain::period_label(period),
            value: crate::domain::parse_value(value),
            raw_value: value.to_string(),
            footnotes: Vec::new(),
        }
    }

    fn monthly(name: &str, category: Category, year: i32, months: u32) -> Vec<DataPoint> {
        (1..=months)
            .map(|m| record(name, category, year, &format!("M{m:02}"), &format!("{m}.0")))
            .collect()
    }

    fn select(category: Option<&str>, subcategory: Option<&str>) -> FilterSelection {
        FilterSelection {
            category: category.map(str::to_string),
            subcategory: subcategory.map(str::to_string),
            year: None,
            period: None,
        }
    }

    #[test]
    fn states_view_categories_are_fixed() {
        let expected = vec!["Unemployment rate".to_string(), "nonfarm employment".to_string()];
        assert_eq!(compute_options(&[], View::States).categories, expected);

        let records = monthly("National Unemployment Rate", Category::National, 2024, 2);
        assert_eq!(compute_options(&records, View::States).categories, expected);
    }

    #[test]
    fn options_are_distinct_in_first_seen_order() {
        let mut records = monthly("Consumer Price Index", Category::Inflation, 2024, 2);
        records.extend(monthly("National Unemployment Rate", Category::National, 2023, 3));
        records.extend(monthly("Texas Unemployment Rate", Category::StateData, 2023, 1));
        records.extend(monthly("Texas Total Nonfarm Employment", Category::StateData, 2023, 1));

        let opts = compute_options(&records, View::All);
        assert_eq!(opts.categories, vec!["Inflation", "National", "State Data"]);
        assert_eq!(opts.years, vec!["2024", "2023"]);
        assert_eq!(opts.periods, vec!["M01", "M02", "M03"]);
        assert_eq!(opts.subcategories, vec!["Texas", "Texas Total Nonfarm Employment"]);
    }

    #[test]
    fn at_most_five_most_recent_per_name() {
        let mut records = monthly("National Unemployment Rate", Category::National, 2023, 12);
        records.extend(monthly("National Unemployment Rate", Category::National, 2024, 3));
        records.extend(monthly("Consumer Price Index", Category::Inflation, 2024, 2));

        let out = apply(&records, View::All, &FilterSelection::default(), "");
        let unrate: Vec<_> = out
            .iter()
            .filter(|r| r.name == "National Unemployment Rate")
            .map(|r| (r.year, r.period.as_str()))
            .collect();
        assert_eq!(
            unrate,
            vec![(2024, "M03"), (2024, "M02"), (2024, "M01"), (2023, "M12"), (2023, "M11")]
        );
        assert_eq!(out.len(), 7);
    }

    #[test]
    fn groups_follow_first_appearance_after_sort() {
        let mut records = monthly("Alpha", Category::National, 2022, 2);
        records.extend(monthly("Beta", Category::National, 2024, 1));
        let out = apply(&records, View::All, &FilterSelection::default(), "");
        let names: Vec<_> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Alpha", "Alpha"]);
    }

    #[test]
    fn search_matches_either_direction_case_insensitively() {
        let records = vec![
            record("Florida Unemployment Rate", Category::StateData, 2024, "M01", "3.1"),
            record("Consumer Price Index", Category::Inflation, 2024, "M01", "310.3"),
        ];

        let out = apply(&records, View::All, &FilterSelection::default(), "FLORIDA");
        assert_eq!(out.len(), 1);

        let out = apply(&records, View::All, &FilterSelection::default(), "show consumer price index please");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Consumer Price Index");

        let out = apply(&records, View::All, &FilterSelection::default(), "310");
        assert_eq!(out.len(), 1);

        let out = apply(&records, View::All, &FilterSelection::default(), "zzz");
        assert!(out.is_empty());
    }

    #[test]
    fn whitespace_only_search_is_a_real_query() {
        let mut records = vec![
            record("Alpha", Category::National, 2024, "M01", "3.1"),
            record("Consumer Price Index", Category::Inflation, 2024, "M01", "310.3"),
        ];
        for r in &mut records {
            r.period_name = "January".to_string();
        }
        assert_eq!(apply(&records, View::All, &FilterSelection::default(), "").len(), 2);

        let out = apply(&records, View::All, &FilterSelection::default(), " ");
        let names: Vec<_> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Consumer Price Index"]);
    }

    #[test]
    fn category_is_exact_outside_states_view() {
        let mut records = monthly("National Unemployment Rate", Category::National, 2024, 1);
        records.extend(monthly("Consumer Price Index", Category::Inflation, 2024, 1));
        let out = apply(&records, View::National, &select(Some("Inflation"), None), "");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].category, Category::Inflation);
    }

    #[test]
    fn states_view_maps_pseudo_categories_to_names() {
        let mut records = monthly("Ohio Unemployment Rate", Category::StateData, 2024, 1);
        records.extend(monthly("Ohio Total Nonfarm Employment", Category::StateData, 2024, 1));
        records.extend(monthly("Oregon Unemployment Rate", Category::StateData, 2024, 1));

        let out = apply(&records, View::States, &select(Some("nonfarm employment"), Some("Ohio")), "");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Ohio Total Nonfarm Employment");

        let out = apply(&records, View::States, &select(Some("Unemployment rate"), None), "");
        assert_eq!(out.len(), 2);

        // Unknown pseudo-category passes everything through.
        let out = apply(&records, View::States, &select(Some("Inflation"), Some("Ohio")), "");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn subcategory_only_applies_to_states_view() {
        let records = monthly("Ohio Unemployment Rate", Category::StateData, 2024, 1);
        let sel = select(None, Some("Texas"));
        assert!(apply(&records, View::States, &sel, "").is_empty());
        assert_eq!(apply(&records, View::All, &sel, "").len(), 1);
    }

    #[test]
    fn year_and_period_are_exact() {
        let mut records = monthly("National Unemployment Rate", Category::National, 2023, 3);
        records.extend(monthly("National Unemployment Rate", Category::National, 2024, 3));
        let sel = FilterSelection {
            year: Some("2023".to_string()),
            period: Some("M02".to_string()),
            ..FilterSelection::default()
        };
        let out = apply(&records, View::All, &sel, "");
        assert_eq!(out.len(), 1);
        assert_eq!((out[0].year, out[0].period.as_str()), (2023, "M02"));
    }

    #[test]
    fn core_series_requires_all_three() {
        let mut records = monthly("National Unemployment Rate", Category::National, 2024, 1);
        records.extend(monthly("Consumer Price Index", Category::Inflation, 2024, 1));
        assert!(!core_series_loaded(&records));
        records.extend(monthly("Producer Price Index", Category::Inflation, 2024, 1));
        assert!(core_series_loaded(&records));
    }
}
