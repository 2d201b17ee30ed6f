//! Per-series descriptive statistics over a record subset.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{DataPoint, SeriesStats};

/// Statistics for one series, with the labels needed to display them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub id: String,
    pub name: String,
    pub unit: String,
    #[serde(flatten)]
    pub stats: SeriesStats,
}

/// Series id -> statistics, in the order series first appear in the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatisticsMap {
    entries: Vec<SeriesSummary>,
}

impl StatisticsMap {
    pub fn get(&self, series_id: &str) -> Option<&SeriesStats> {
        self.entries
            .iter()
            .find(|e| e.id == series_id)
            .map(|e| &e.stats)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesSummary> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Summarize every series present in `records`.
///
/// Series without a single parseable value are left out. Returns `None` when
/// nothing is left to report.
pub fn summarize(records: &[DataPoint]) -> Option<StatisticsMap> {
    let mut order: Vec<&DataPoint> = Vec::new();
    let mut values: HashMap<&str, Vec<f64>> = HashMap::new();

    for record in records {
        let bucket = values.entry(record.id.as_str()).or_insert_with(|| {
            order.push(record);
            Vec::new()
        });
        if let Some(v) = record.value {
            bucket.push(v);
        }
    }

    let entries: Vec<SeriesSummary> = order
        .into_iter()
        .filter_map(|first| {
            let stats = series_stats(values.get(first.id.as_str())?)?;
            Some(SeriesSummary {
                id: first.id.clone(),
                name: first.name.clone(),
                unit: first.unit.clone(),
                stats,
            })
        })
        .collect();

    if entries.is_empty() {
        None
    } else {
        Some(StatisticsMap { entries })
    }
}

/// Count, mean, median, mode, min, max of finite values; `None` when empty.
pub fn series_stats(values: &[f64]) -> Option<SeriesStats> {
    if values.is_empty() {
        return None;
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    Some(SeriesStats {
        total_count: n,
        average: round2(mean),
        median: round2(median),
        mode: mode(values),
        min: round2(sorted[0]),
        max: round2(sorted[n - 1]),
    })
}

/// Most frequent value after rounding to two decimals; ties go to the smallest.
fn mode(values: &[f64]) -> f64 {
    let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
    for v in values {
        // `+ 0.0` folds -0.0 into 0.0 so both share a key.
        let rounded = round2(*v) + 0.0;
        counts.entry(rounded.to_bits()).or_insert((rounded, 0)).1 += 1;
    }

    counts
        .into_values()
        .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then_with(|| vb.total_cmp(va)))
        .map(|(v, _)| v)
        .unwrap_or(0.0)
}

/// Round to two decimal places; values too large to scale are returned as is.
pub fn round2(v: f64) -> f64 {
    let scaled = v * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        v
    }
}
