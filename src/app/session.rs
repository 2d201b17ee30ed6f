//! Explorer session state shared by the TUI: current view, filters, search,
//! and the latest acquisition results.
//!
//! Acquisition cycles are tagged with a generation number. A cycle that
//! completes after a newer one was started is discarded, so a slow response
//! for an old view never overwrites fresher state.

use chrono::{DateTime, Local};

use crate::app::pipeline::{Derived, derive};
use crate::data::{Acquisition, SeriesCatalog};
use crate::domain::{DataPoint, FilterSelection, View};
use crate::error::BlsError;

/// Editable filter fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Category,
    Subcategory,
    Year,
    Period,
}

impl FilterField {
    pub fn label(self) -> &'static str {
        match self {
            FilterField::Category => "Category",
            FilterField::Subcategory => "State",
            FilterField::Year => "Year",
            FilterField::Period => "Period",
        }
    }

    /// Fields shown for a view; the state picker only exists under `states`.
    pub fn visible(view: View) -> &'static [FilterField] {
        match view {
            View::States => &[
                FilterField::Category,
                FilterField::Subcategory,
                FilterField::Year,
                FilterField::Period,
            ],
            View::All | View::National => {
                &[FilterField::Category, FilterField::Year, FilterField::Period]
            }
        }
    }
}

/// What a worker needs to run one acquisition cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub view: View,
    pub selection: FilterSelection,
}

pub struct Session {
    catalog: &'static SeriesCatalog,
    view: View,
    selection: FilterSelection,
    /// Text as typed; only affects filtering once submitted.
    search_text: String,
    search_query: String,
    show_records: bool,

    records: Vec<DataPoint>,
    diagnostics: Vec<String>,
    error: Option<String>,
    loading: bool,
    fetched_at: Option<DateTime<Local>>,

    generation: u64,
    /// View and selection the latest cycle was started for.
    requested: Option<(View, FilterSelection)>,
    derived: Derived,
}

impl Session {
    pub fn new(catalog: &'static SeriesCatalog, view: View) -> Self {
        let mut session = Self {
            catalog,
            view,
            selection: FilterSelection::for_view(view),
            search_text: String::new(),
            search_query: String::new(),
            show_records: false,
            records: Vec::new(),
            diagnostics: Vec::new(),
            error: None,
            loading: false,
            fetched_at: None,
            generation: 0,
            requested: None,
            derived: Derived::default(),
        };
        session.recompute();
        session
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn show_records(&self) -> bool {
        self.show_records
    }

    pub fn records(&self) -> &[DataPoint] {
        &self.records
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn fetched_at(&self) -> Option<DateTime<Local>> {
        self.fetched_at
    }

    /// Filter options, filtered records, and statistics for the current state.
    pub fn derived(&self) -> &Derived {
        &self.derived
    }

    /// Switch tabs. Filters return to the tab's defaults and search is cleared.
    pub fn set_view(&mut self, view: View) {
        self.view = view;
        self.selection = FilterSelection::for_view(view);
        self.search_text.clear();
        self.search_query.clear();
        self.show_records = false;
        self.recompute();
    }

    /// Set one filter field (`None` = all).
    ///
    /// Picking a state under `states` resets the other fields and reveals the
    /// record list.
    pub fn set_filter(&mut self, field: FilterField, value: Option<String>) {
        match field {
            FilterField::Subcategory if self.view == View::States => {
                self.selection = FilterSelection {
                    subcategory: value,
                    ..FilterSelection::default()
                };
                self.show_records = true;
            }
            FilterField::Category => self.selection.category = value,
            FilterField::Subcategory => self.selection.subcategory = value,
            FilterField::Year => self.selection.year = value,
            FilterField::Period => self.selection.period = value,
        }
        self.recompute();
    }

    pub fn filter_value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Category => self.selection.category.as_deref(),
            FilterField::Subcategory => self.selection.subcategory.as_deref(),
            FilterField::Year => self.selection.year.as_deref(),
            FilterField::Period => self.selection.period.as_deref(),
        }
    }

    /// Values a field can take; `None` stands for "all".
    pub fn filter_choices(&self, field: FilterField) -> Vec<Option<String>> {
        let options = &self.derived.options;
        let values: Vec<String> = match field {
            FilterField::Subcategory => {
                // State picker offers every catalog state, with no "all" entry.
                return self
                    .catalog
                    .state_names()
                    .into_iter()
                    .map(|s| Some(s.to_string()))
                    .collect();
            }
            FilterField::Category => options.categories.clone(),
            FilterField::Year => options.years.clone(),
            FilterField::Period => options.periods.clone(),
        };
        std::iter::once(None).chain(values.into_iter().map(Some)).collect()
    }

    /// Step a field through its choices, wrapping around.
    pub fn cycle_filter(&mut self, field: FilterField, delta: i32) {
        let choices = self.filter_choices(field);
        if choices.is_empty() {
            return;
        }
        let current = self.filter_value(field).map(str::to_string);
        let len = choices.len() as i64;
        let next = match choices.iter().position(|c| *c == current) {
            Some(idx) => (idx as i64 + i64::from(delta)).rem_euclid(len),
            None => 0,
        };
        let value = choices[next as usize].clone();
        self.set_filter(field, value);
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_text.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search_text.pop();
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Apply the typed search text.
    ///
    /// Text naming a state jumps to that state under `states`. Returns the
    /// matched state, if any.
    pub fn submit_search(&mut self) -> Option<&'static str> {
        self.search_query = self.search_text.clone();

        let matched = self.catalog.match_state(&self.search_query);
        if let Some(state) = matched {
            self.view = View::States;
            self.selection = FilterSelection {
                subcategory: Some(state.to_string()),
                ..FilterSelection::default()
            };
            self.show_records = true;
        }
        self.recompute();
        matched
    }

    /// Restore the tab's default filters and clear search.
    pub fn reset_filters(&mut self) {
        self.selection = FilterSelection::for_view(self.view);
        self.search_text.clear();
        self.search_query.clear();
        self.recompute();
    }

    pub fn toggle_records(&mut self) {
        self.show_records = !self.show_records;
    }

    /// Whether the view or any filter field changed since the latest cycle
    /// was started. Every such change refetches; nothing is cached.
    pub fn needs_fetch(&self) -> bool {
        self.requested.as_ref() != Some(&(self.view, self.selection.clone()))
    }

    /// Force the next [`Session::needs_fetch`] to report true.
    pub fn invalidate(&mut self) {
        self.requested = None;
    }

    /// Start a new acquisition cycle, superseding any in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.requested = Some((self.view, self.selection.clone()));
        FetchTicket {
            generation: self.generation,
            view: self.view,
            selection: self.selection.clone(),
        }
    }

    /// Install the result of a cycle. Results from superseded cycles are
    /// dropped; returns whether the result was applied.
    pub fn finish_fetch(&mut self, generation: u64, result: Result<Acquisition, BlsError>) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, latest = self.generation, "discarding stale acquisition");
            return false;
        }

        self.loading = false;
        self.fetched_at = Some(Local::now());
        match result {
            Ok(acq) => {
                self.records = acq.records;
                self.diagnostics = acq.diagnostics;
                self.error = None;
            }
            Err(err) => {
                self.records = Vec::new();
                self.error = Some(err.top_level_message());
                self.diagnostics = match err {
                    BlsError::Acquisition { diagnostics } => diagnostics,
                    _ => Vec::new(),
                };
            }
        }
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        self.derived = derive(&self.records, self.view, &self.selection, &self.search_query);
    }
}
