//! Shared explorer pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! catalog -> acquisition -> filter options + filtered records -> statistics
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::config::ApiConfig;
use crate::data::{Acquisition, BlsClient, SeriesCatalog, SeriesSource, acquire};
use crate::domain::{DataPoint, FilterOptions, FilterSelection, View};
use crate::error::BlsError;
use crate::filter::{apply, compute_options, core_series_loaded};
use crate::stats::{StatisticsMap, summarize};

/// Everything the presentation layer derives from a record list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derived {
    pub options: FilterOptions,
    pub filtered: Vec<DataPoint>,
    pub statistics: Option<StatisticsMap>,
    /// Headline series all present in the filtered records.
    pub core_loaded: bool,
}

/// Recompute filter options, the filtered subset, and its statistics.
pub fn derive(records: &[DataPoint], view: View, selection: &FilterSelection, search: &str) -> Derived {
    let options = compute_options(records, view);
    let filtered = apply(records, view, selection, search);
    let statistics = summarize(&filtered);
    let core_loaded = core_series_loaded(&filtered);
    Derived {
        options,
        filtered,
        statistics,
        core_loaded,
    }
}

/// All computed outputs of a single `bls fetch` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub acquisition: Acquisition,
    pub derived: Derived,
}

/// Fetch from the BLS API and derive the filtered view.
pub fn run_fetch(
    config: &ApiConfig,
    view: View,
    selection: &FilterSelection,
    search: &str,
) -> Result<RunOutput, BlsError> {
    let client = BlsClient::new(config)?;
    run_with_source(&client, config, view, selection, search)
}

/// Execute the pipeline against any series source.
///
/// This is useful for tests, where a stub replaces the HTTP client.
pub fn run_with_source<S: SeriesSource + ?Sized>(
    source: &S,
    config: &ApiConfig,
    view: View,
    selection: &FilterSelection,
    search: &str,
) -> Result<RunOutput, BlsError> {
    let acquisition = acquire(
        source,
        SeriesCatalog::bls(),
        view,
        selection,
        config.start_year,
        config.end_year,
    )?;
    let derived = derive(&acquisition.records, view, selection, search);
    Ok(RunOutput {
        acquisition,
        derived,
    })
}
