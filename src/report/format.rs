//! Formatted terminal output for CLI runs.
//!
//! We keep formatting code in one place so:
//! - the acquisition and filtering code stays clean and testable
//! - output changes are localized

use crate::data::{Acquisition, SeriesCatalog};
use crate::domain::{Category, DataPoint, FilterSelection, View};
use crate::stats::StatisticsMap;

const NAME_WIDTH: usize = 44;

/// Header describing what was fetched and how it was narrowed.
pub fn format_run_header(
    view: View,
    selection: &FilterSelection,
    search: &str,
    acquisition: &Acquisition,
    filtered: usize,
) -> String {
    let mut out = String::new();

    out.push_str("=== bls - Bureau of Labor Statistics Data Explorer ===\n");
    out.push_str(&format!("View: {}\n", view.display_name()));
    out.push_str(&format!("Filters: {}\n", describe_selection(selection)));
    if !search.trim().is_empty() {
        out.push_str(&format!("Search: \"{}\"\n", search.trim()));
    }
    out.push_str(&format!(
        "Records: fetched={} | shown={}\n",
        acquisition.records.len(),
        filtered
    ));
    out.push('\n');

    out
}

fn describe_selection(selection: &FilterSelection) -> String {
    let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "all".to_string());
    format!(
        "category={} subcategory={} year={} period={}",
        show(&selection.category),
        show(&selection.subcategory),
        show(&selection.year),
        show(&selection.period),
    )
}

/// Per-series statistics, one block per series.
pub fn format_statistics(statistics: Option<&StatisticsMap>) -> String {
    let mut out = String::new();

    out.push_str("Statistics:\n");
    let Some(statistics) = statistics else {
        out.push_str("  (no statistics available)\n\n");
        return out;
    };

    for entry in statistics.iter() {
        let s = &entry.stats;
        let unit = &entry.unit;
        out.push_str(&format!("- {}\n", entry.name));
        out.push_str(&format!("    Total Records: {}\n", s.total_count));
        out.push_str(&format!("    Average: {:.2} {unit}\n", s.average));
        out.push_str(&format!("    Median:  {:.2} {unit}\n", s.median));
        out.push_str(&format!("    Mode:    {:.2} {unit}\n", s.mode));
        out.push_str(&format!("    Range:   {:.2} - {:.2} {unit}\n", s.min, s.max));
    }
    out.push('\n');

    out
}

/// One line per record, with footnotes underneath.
pub fn format_records(records: &[DataPoint]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Records ({}):\n", records.len()));
    if records.is_empty() {
        out.push_str("  No data available for the current filters.\n\n");
        return out;
    }

    out.push_str(&format!(
        "{:<w$} {:<12} {:>14} {:<10} {}\n",
        "Series",
        "Category",
        "Value",
        "Unit",
        "Period",
        w = NAME_WIDTH,
    ));
    for r in records {
        out.push_str(
            format!(
                "{:<w$} {:<12} {:>14} {:<10} {}\n",
                truncate(&r.name, NAME_WIDTH),
                category_badge(r.category),
                r.raw_value,
                r.unit,
                period_caption(r),
                w = NAME_WIDTH,
            )
            .trim_end(),
        );
        out.push('\n');
        for note in &r.footnotes {
            out.push_str(&format!("    * {}\n", note.text));
        }
    }
    out.push('\n');

    out
}

/// `"{period name} {year}"`, the caption shown under a record value.
pub fn period_caption(record: &DataPoint) -> String {
    format!("{} {}", record.period_name, record.year).trim().to_string()
}

pub fn category_badge(category: Category) -> &'static str {
    category.display_name()
}

/// Per-series failures that did not stop the run.
pub fn format_diagnostics(diagnostics: &[String]) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("Some series could not be fetched:\n");
    for d in diagnostics {
        out.push_str(&format!("  - {d}\n"));
    }
    out.push('\n');
    out
}

/// Catalog listing, optionally restricted to one category.
pub fn format_catalog(catalog: &SeriesCatalog, category: Option<Category>) -> String {
    let mut out = String::new();

    let descriptors: Vec<_> = match category {
        Some(c) => catalog.by_category(c).collect(),
        None => catalog.iter().collect(),
    };

    out.push_str(&format!("Series catalog ({} series):\n", descriptors.len()));
    out.push_str(&format!(
        "{:<26} {:<w$} {:<12} {}\n",
        "Id",
        "Name",
        "Category",
        "Unit",
        w = NAME_WIDTH,
    ));
    for d in descriptors {
        out.push_str(&format!(
            "{:<26} {:<w$} {:<12} {}\n",
            d.id,
            truncate(&d.name, NAME_WIDTH),
            d.category.display_name(),
            d.unit,
            w = NAME_WIDTH,
        ));
    }

    out
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
