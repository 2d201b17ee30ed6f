//! End-to-end pipeline tests against a stub series source.

use std::collections::HashMap;
use std::sync::Mutex;

use bls_explorer::app::pipeline::run_with_source;
use bls_explorer::app::session::Session;
use bls_explorer::config::ApiConfig;
use bls_explorer::data::{RawObservation, SeriesCatalog, SeriesSource, acquire};
use bls_explorer::domain::{Category, FilterSelection, View};
use bls_explorer::error::BlsError;
use bls_explorer::filter::PER_SERIES_LIMIT;

/// Serves canned months for every series except the ones told to fail.
struct StubSource {
    failing: HashMap<&'static str, BlsError>,
    calls: Mutex<Vec<String>>,
}

impl StubSource {
    fn healthy() -> Self {
        Self {
            failing: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(ids: &[&'static str]) -> Self {
        let failing = ids
            .iter()
            .map(|id| (*id, BlsError::transport("HTTP error! status: 503")))
            .collect();
        Self {
            failing,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl SeriesSource for StubSource {
    fn fetch(&self, series_id: &str, start_year: i32, end_year: i32) -> Result<Vec<RawObservation>, BlsError> {
        self.calls.lock().unwrap().push(series_id.to_string());
        if let Some(err) = self.failing.get(series_id) {
            return Err(err.clone());
        }
        let mut out = Vec::new();
        for year in start_year..=end_year {
            for month in 1..=12 {
                out.push(RawObservation {
                    year: year.to_string(),
                    period: format!("M{month:02}"),
                    period_name: format!("Month {month}"),
                    value: format!("{}.{}", 100 + month, year % 10),
                    footnotes: Vec::new(),
                });
            }
        }
        Ok(out)
    }
}

fn config() -> ApiConfig {
    ApiConfig::build("test-key".to_string(), None, 2023, 2024).unwrap()
}

fn catalog() -> &'static SeriesCatalog {
    SeriesCatalog::bls()
}

#[test]
fn national_view_survives_a_failing_inflation_series() {
    let source = StubSource::failing(&["CUUR0000SA0"]);
    let run = run_with_source(&source, &config(), View::National, &FilterSelection::default(), "").unwrap();

    assert_eq!(source.calls().len(), 7);
    assert_eq!(
        run.acquisition.diagnostics,
        vec!["Failed to fetch Consumer Price Index: HTTP error! status: 503".to_string()]
    );
    assert!(!run.acquisition.records.is_empty());
    assert!(run.acquisition.records.iter().all(|r| r.name != "Consumer Price Index"));
    assert!(!run.derived.core_loaded);
}

#[test]
fn all_failures_are_an_acquisition_error() {
    let ids: Vec<&'static str> = catalog().national().iter().map(|d| d.id.as_str()).collect();
    let source = StubSource::failing(&ids);
    let err = run_with_source(&source, &config(), View::National, &FilterSelection::default(), "").unwrap_err();
    match err {
        BlsError::Acquisition { diagnostics } => assert_eq!(diagnostics.len(), 7),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn default_view_fetches_headline_series_and_florida() {
    let source = StubSource::healthy();
    let run = run_with_source(&source, &config(), View::All, &FilterSelection::default(), "").unwrap();

    assert_eq!(
        source.calls(),
        vec![
            "LNS14000000",
            "CES0000000001",
            "CUUR0000SA0",
            "WPUFD4",
            "LASST120000000000003",
            "SMS12000000000000001",
        ]
    );
    assert!(run.derived.core_loaded);
    assert_eq!(run.derived.filtered.len(), 6 * PER_SERIES_LIMIT);
}

#[test]
fn filtered_records_are_the_most_recent_per_series() {
    let source = StubSource::healthy();
    let run = run_with_source(&source, &config(), View::National, &FilterSelection::default(), "").unwrap();

    for descriptor in catalog().national() {
        let shown: Vec<_> = run
            .derived
            .filtered
            .iter()
            .filter(|r| r.name == descriptor.name)
            .map(|r| (r.year, r.period.clone()))
            .collect();
        let expected: Vec<_> = (8..=12).rev().map(|m| (2024, format!("M{m:02}"))).collect();
        assert_eq!(shown, expected, "{}", descriptor.name);
    }
}

#[test]
fn statistics_count_every_valid_value() {
    let source = StubSource::healthy();
    let run = run_with_source(&source, &config(), View::National, &FilterSelection::default(), "").unwrap();
    let stats = run.derived.statistics.unwrap();

    assert_eq!(stats.len(), 7);
    let unrate = stats.get("LNS14000000").unwrap();
    assert_eq!(unrate.total_count, PER_SERIES_LIMIT);
    assert_eq!(unrate.max, 112.4);
    assert_eq!(unrate.min, 108.4);
    assert_eq!(unrate.median, 110.4);
}

#[test]
fn records_carry_their_descriptor_fields() {
    let source = StubSource::healthy();
    let selection = FilterSelection::for_view(View::States);
    let acq = acquire(&source, catalog(), View::States, &selection, 2024, 2024).unwrap();

    assert_eq!(acq.records.len(), 24);
    for record in &acq.records {
        let descriptor = catalog().by_id(&record.id).unwrap();
        assert_eq!(record.name, descriptor.name);
        assert_eq!(record.category, Category::StateData);
        assert_eq!(record.subcategory.as_deref(), Some("Florida"));
        assert_eq!(record.unit, descriptor.unit);
    }
}

#[test]
fn session_follows_a_state_search_through_a_fetch_cycle() {
    let source = StubSource::healthy();
    let mut session = Session::new(catalog(), View::All);

    session.set_search_text("texas");
    assert_eq!(session.submit_search(), Some("Texas"));
    assert!(session.needs_fetch());

    let ticket = session.begin_fetch();
    assert_eq!(ticket.view, View::States);
    let result = acquire(&source, catalog(), ticket.view, &ticket.selection, 2024, 2024);
    assert!(session.finish_fetch(ticket.generation, result));

    assert!(!session.needs_fetch());
    assert!(session.show_records());
    let filtered = &session.derived().filtered;
    assert_eq!(filtered.len(), 2 * PER_SERIES_LIMIT);
    assert!(filtered.iter().all(|r| r.name.starts_with("Texas")));
}
