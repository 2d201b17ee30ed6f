//! Multi-series acquisition: pick the series for a view, fetch them one at a
//! time, and merge the successes into a single record list.
//!
//! Individual failures never abort the loop; they are collected as
//! diagnostics. The cycle as a whole fails only when the credential is
//! missing, or when nothing at all could be fetched.

use tracing::{debug, info, warn};

use crate::data::bls::{RawObservation, SeriesSource};
use crate::data::catalog::{DEFAULT_STATE, SeriesCatalog};
use crate::domain::{
    Category, DataPoint, FilterSelection, Footnote, SeriesDescriptor, View, parse_value, recency_cmp,
};
use crate::error::BlsError;

/// Headline series fetched for the default view (matched by name fragment).
const HEADLINE_NATIONAL: [&str; 2] = ["National Unemployment Rate", "Total Nonfarm Employment"];
const HEADLINE_INFLATION: [&str; 2] = ["Consumer Price Index", "Producer Price Index"];

/// Output of one acquisition cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Acquisition {
    /// Normalized records, most recent first.
    pub records: Vec<DataPoint>,
    /// One message per failed series, in fetch order.
    pub diagnostics: Vec<String>,
}

impl Acquisition {
    /// Some series failed but others succeeded.
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Select which catalog series a view needs.
pub fn plan<'a>(
    catalog: &'a SeriesCatalog,
    view: View,
    selection: &FilterSelection,
) -> Vec<&'a SeriesDescriptor> {
    match view {
        View::National => catalog
            .national()
            .iter()
            .filter(|d| matches!(d.category, Category::National | Category::Inflation))
            .collect(),
        View::States => {
            let state = selection.state();
            catalog
                .states()
                .iter()
                .filter(|d| d.name.starts_with(state))
                .collect()
        }
        View::All => {
            let headline = catalog.national().iter().filter(|d| match d.category {
                Category::National => HEADLINE_NATIONAL.iter().any(|n| d.name.contains(n)),
                Category::Inflation => HEADLINE_INFLATION.iter().any(|n| d.name.contains(n)),
                Category::StateData => false,
            });
            // Only one state up front to bound the initial request volume.
            let default_state = catalog
                .states()
                .iter()
                .filter(|d| d.subcategory.as_deref() == Some(DEFAULT_STATE));
            headline.chain(default_state).collect()
        }
    }
}

/// Run one acquisition cycle.
///
/// Fetches are strictly sequential, in plan order.
pub fn acquire<S: SeriesSource + ?Sized>(
    source: &S,
    catalog: &SeriesCatalog,
    view: View,
    selection: &FilterSelection,
    start_year: i32,
    end_year: i32,
) -> Result<Acquisition, BlsError> {
    let series = plan(catalog, view, selection);
    if let Some(bad) = series.iter().find(|d| d.id.trim().is_empty()) {
        return Err(BlsError::config(format!("Series ID is required ({})", bad.name)));
    }
    info!(view = ?view, series = series.len(), start_year, end_year, "starting acquisition");

    let mut records = Vec::new();
    let mut diagnostics = Vec::new();

    for descriptor in series {
        let result = source
            .fetch(&descriptor.id, start_year, end_year)
            .and_then(|raw| normalize(descriptor, raw));

        match result {
            Ok(points) => {
                debug!(series_id = %descriptor.id, points = points.len(), "series fetched");
                records.extend(points);
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                let message = format!("Failed to fetch {}: {err}", descriptor.name);
                warn!(series_id = %descriptor.id, "{message}");
                diagnostics.push(message);
            }
        }
    }

    if records.is_empty() && !diagnostics.is_empty() {
        return Err(BlsError::Acquisition { diagnostics });
    }

    records.sort_by(recency_cmp);
    info!(
        records = records.len(),
        failures = diagnostics.len(),
        "acquisition finished"
    );

    Ok(Acquisition {
        records,
        diagnostics,
    })
}

/// Copy the descriptor onto each observation and parse its numeric fields.
pub fn normalize(
    descriptor: &SeriesDescriptor,
    raw: Vec<RawObservation>,
) -> Result<Vec<DataPoint>, BlsError> {
    raw.into_iter()
        .map(|obs| {
            let year = obs.year.trim().parse::<i32>().map_err(|_| {
                BlsError::api(format!("Invalid year '{}' for {}", obs.year, descriptor.id))
            })?;
            let footnotes = obs
                .footnotes
                .into_iter()
                .filter_map(|f| {
                    let text = f.text?.trim().to_string();
                    (!text.is_empty()).then_some(Footnote { code: f.code, text })
                })
                .collect();

            Ok(DataPoint {
                id: descriptor.id.clone(),
                name: descriptor.name.clone(),
                category: descriptor.category,
                subcategory: descriptor.subcategory.clone(),
                unit: descriptor.unit.clone(),
                year,
                period: obs.period,
                period_name: obs.period_name,
                value: parse_value(&obs.value),
                raw_value: obs.value,
                footnotes,
            })
        })
        .collect()
}
