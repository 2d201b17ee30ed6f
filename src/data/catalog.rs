//! Static catalog of known BLS series.

use std::sync::LazyLock;

use crate::domain::{Category, SeriesDescriptor, StateIndicator};

/// State used when none is selected.
pub const DEFAULT_STATE: &str = "Florida";

/// (id, name, category, unit) for national and inflation indicators.
const NATIONAL_SERIES: [(&str, &str, Category, &str); 7] = [
    ("LNS14000000", "National Unemployment Rate", Category::National, "%"),
    ("CES0000000001", "Total Nonfarm Employment", Category::National, "Thousands"),
    ("LNS11300000", "Labor Force Participation Rate", Category::National, "%"),
    ("CES0500000003", "Average Hourly Earnings", Category::National, "$"),
    ("CUUR0000SA0", "Consumer Price Index", Category::Inflation, "Index"),
    ("CUUR0000SA0L1E", "Core CPI (Less Food and Energy)", Category::Inflation, "Index"),
    ("WPUFD4", "Producer Price Index", Category::Inflation, "Index"),
];

/// State name and FIPS code.
const STATES: [(&str, &str); 50] = [
    ("Alabama", "01"),
    ("Alaska", "02"),
    ("Arizona", "04"),
    ("Arkansas", "05"),
    ("California", "06"),
    ("Colorado", "08"),
    ("Connecticut", "09"),
    ("Delaware", "10"),
    ("Florida", "12"),
    ("Georgia", "13"),
    ("Hawaii", "15"),
    ("Idaho", "16"),
    ("Illinois", "17"),
    ("Indiana", "18"),
    ("Iowa", "19"),
    ("Kansas", "20"),
    ("Kentucky", "21"),
    ("Louisiana", "22"),
    ("Maine", "23"),
    ("Maryland", "24"),
    ("Massachusetts", "25"),
    ("Michigan", "26"),
    ("Minnesota", "27"),
    ("Mississippi", "28"),
    ("Missouri", "29"),
    ("Montana", "30"),
    ("Nebraska", "31"),
    ("Nevada", "32"),
    ("New Hampshire", "33"),
    ("New Jersey", "34"),
    ("New Mexico", "35"),
    ("New York", "36"),
    ("North Carolina", "37"),
    ("North Dakota", "38"),
    ("Ohio", "39"),
    ("Oklahoma", "40"),
    ("Oregon", "41"),
    ("Pennsylvania", "42"),
    ("Rhode Island", "44"),
    ("South Carolina", "45"),
    ("South Dakota", "46"),
    ("Tennessee", "47"),
    ("Texas", "48"),
    ("Utah", "49"),
    ("Vermont", "50"),
    ("Virginia", "51"),
    ("Washington", "53"),
    ("West Virginia", "54"),
    ("Wisconsin", "55"),
    ("Wyoming", "56"),
];

static BLS_CATALOG: LazyLock<SeriesCatalog> = LazyLock::new(|| {
    let national = NATIONAL_SERIES
        .iter()
        .map(|&(id, name, category, unit)| SeriesDescriptor {
            id: id.to_string(),
            name: name.to_string(),
            category,
            subcategory: None,
            unit: unit.to_string(),
        })
        .collect();

    let mut states = Vec::with_capacity(STATES.len() * 2);
    for (state, fips) in STATES {
        states.push(state_series(state, fips, StateIndicator::UnemploymentRate));
        states.push(state_series(state, fips, StateIndicator::NonfarmEmployment));
    }

    SeriesCatalog::new(national, states)
});

fn state_series(state: &str, fips: &str, indicator: StateIndicator) -> SeriesDescriptor {
    let (id, unit) = match indicator {
        // Local Area Unemployment Statistics, statewide, seasonally adjusted rate.
        StateIndicator::UnemploymentRate => (format!("LASST{fips}0000000000003"), "%"),
        // State and Metro Area Employment, total nonfarm, seasonally adjusted.
        StateIndicator::NonfarmEmployment => (format!("SMS{fips}000000000000001"), "Thousands"),
    };
    SeriesDescriptor {
        id,
        name: format!("{state} {}", indicator.name_fragment()),
        category: Category::StateData,
        subcategory: Some(state.to_string()),
        unit: unit.to_string(),
    }
}

/// Read-only table of series descriptors.
#[derive(Debug, Clone)]
pub struct SeriesCatalog {
    national: Vec<SeriesDescriptor>,
    states: Vec<SeriesDescriptor>,
}

impl SeriesCatalog {
    pub fn new(national: Vec<SeriesDescriptor>, states: Vec<SeriesDescriptor>) -> Self {
        Self { national, states }
    }

    /// The built-in BLS catalog.
    pub fn bls() -> &'static SeriesCatalog {
        &BLS_CATALOG
    }

    /// National and inflation indicators.
    pub fn national(&self) -> &[SeriesDescriptor] {
        &self.national
    }

    /// Per-state indicators.
    pub fn states(&self) -> &[SeriesDescriptor] {
        &self.states
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesDescriptor> {
        self.national.iter().chain(self.states.iter())
    }

    pub fn len(&self) -> usize {
        self.national.len() + self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn by_id(&self, id: &str) -> Option<&SeriesDescriptor> {
        self.iter().find(|d| d.id == id)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &SeriesDescriptor> {
        self.iter().filter(move |d| d.category == category)
    }

    /// State names in catalog order, each listed once.
    pub fn state_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for d in &self.states {
            if let Some(state) = d.subcategory.as_deref() {
                if !names.contains(&state) {
                    names.push(state);
                }
            }
        }
        names
    }

    /// Resolve search text to a state (case-insensitive).
    ///
    /// An exact name wins. Otherwise the longest state name contained in the
    /// query wins ("west virginia rate" is West Virginia, not Virginia). A
    /// query of at least [`MIN_PARTIAL_STATE_QUERY`] characters may also name
    /// part of a state, in which case the shortest such state wins. Empty
    /// queries never match.
    pub fn match_state(&self, query: &str) -> Option<&str> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        let names = self.state_names();
        let lowered: Vec<(&str, String)> = names.iter().map(|s| (*s, s.to_lowercase())).collect();

        if let Some((exact, _)) = lowered.iter().find(|(_, lc)| *lc == query) {
            return Some(*exact);
        }

        let named = lowered
            .iter()
            .filter(|(_, lc)| contains_word(&query, lc))
            .max_by_key(|(_, lc)| lc.len());
        if let Some((state, _)) = named {
            return Some(*state);
        }

        if query.chars().count() < MIN_PARTIAL_STATE_QUERY {
            return None;
        }
        lowered
            .iter()
            .filter(|(_, lc)| lc.contains(&query))
            .min_by_key(|(_, lc)| lc.len())
            .map(|(state, _)| *state)
    }
}

/// Shortest query allowed to match part of a state name.
pub const MIN_PARTIAL_STATE_QUERY: usize = 4;

/// `needle` occurs in `haystack` on word boundaries.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(at, _)| {
        let before = haystack[..at].chars().next_back();
        let after = haystack[at + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_state_has_both_indicators() {
        let catalog = SeriesCatalog::bls();
        let names = catalog.state_names();
        assert_eq!(names.len(), 50);
        for state in names {
            for indicator in StateIndicator::ALL {
                let expected = format!("{state} {}", indicator.name_fragment());
                assert!(
                    catalog.states().iter().any(|d| d.name == expected),
                    "missing {expected}"
                );
            }
        }
    }

    #[test]
    fn names_and_ids_are_unique() {
        let catalog = SeriesCatalog::bls();
        let ids: HashSet<_> = catalog.iter().map(|d| d.id.as_str()).collect();
        let names: HashSet<_> = catalog.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn state_series_ids_follow_bls_layout() {
        let catalog = SeriesCatalog::bls();
        let fl = catalog.by_id("LASST120000000000003").unwrap();
        assert_eq!(fl.name, "Florida Unemployment Rate");
        assert_eq!(fl.subcategory.as_deref(), Some("Florida"));
        let fl_nonfarm = catalog.by_id("SMS12000000000000001").unwrap();
        assert_eq!(fl_nonfarm.name, "Florida Total Nonfarm Employment");
        assert!(catalog.states().iter().all(|d| d.id.len() == 20));
    }

    #[test]
    fn lookup_by_category() {
        let catalog = SeriesCatalog::bls();
        let inflation: Vec<_> = catalog.by_category(Category::Inflation).map(|d| d.name.as_str()).collect();
        assert!(inflation.contains(&"Consumer Price Index"));
        assert!(inflation.contains(&"Producer Price Index"));
        assert_eq!(catalog.by_category(Category::StateData).count(), 100);
    }

    #[test]
    fn match_state_is_case_insensitive_both_ways() {
        let catalog = SeriesCatalog::bls();
        assert_eq!(catalog.match_state("texas"), Some("Texas"));
        assert_eq!(catalog.match_state("Ohio unemployment"), Some("Ohio"));
        assert_eq!(catalog.match_state("Kansas"), Some("Kansas"));
        assert_eq!(catalog.match_state("arkan"), Some("Arkansas"));
        assert_eq!(catalog.match_state("CPI"), None);
        assert_eq!(catalog.match_state("   "), None);
    }

    #[test]
    fn longest_named_state_wins() {
        let catalog = SeriesCatalog::bls();
        assert_eq!(catalog.match_state("West Virginia unemployment"), Some("West Virginia"));
        assert_eq!(catalog.match_state("west virginia nonfarm"), Some("West Virginia"));
        assert_eq!(catalog.match_state("virginia nonfarm"), Some("Virginia"));
        assert_eq!(catalog.match_state("arkansas rate"), Some("Arkansas"));
        assert_eq!(catalog.match_state("new york jobs"), Some("New York"));
    }

    #[test]
    fn short_fragments_do_not_match() {
        let catalog = SeriesCatalog::bls();
        assert_eq!(catalog.match_state("in"), None);
        assert_eq!(catalog.match_state("on"), None);
        assert_eq!(catalog.match_state("ari"), None);
        assert_eq!(catalog.match_state("virgin"), Some("Virginia"));
    }
}
