//! Per-column overview: null/unique counts, numeric summary statistics, and a histogram.
//!
//! Numeric columns with more than [`BIN_COUNT`] distinct values are binned. When the median
//! sits in the outer quarter of the range, the long tail is trimmed from the histogram domain
//! (top or bottom 1% of values) so one extreme value does not squash every bar into one.
//! Trimming never affects the reported statistics.

use std::cmp::Ordering;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::binning::{BIN_COUNT, bin_by, is_probably_year_field, label_bins, label_year_bins};
use crate::container::DataContainer;
use crate::processing::quantile_sorted;
use crate::types::{Cell, ColumnType, DataPoint, NULL_CELL};

/// Histogram domain is split into this many buckets to detect skew.
const SKEW_BUCKETS: f64 = 8.0;
/// Share of values dropped from the long tail of a skewed column.
const TRIM_FRACTION: f64 = 0.01;

/// Options for [`profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileOptions {
    /// Trim the tail of skewed numeric columns from the histogram domain.
    pub trim_outliers: bool,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            trim_outliers: true,
        }
    }
}

/// Overview of a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    pub column: String,
    pub column_type: ColumnType,
    /// Histogram bars (numeric bins) or per-value counts.
    pub chart_data: Vec<DataPoint>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub p50: Option<f64>,
    pub p95: Option<f64>,
    pub nulls: usize,
    pub uniques: usize,
    /// The histogram domain was trimmed; callers may offer to turn trimming off.
    pub has_outliers: bool,
}

/// Summary statistics over the full numeric data of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NumericStats {
    min: f64,
    max: f64,
    mean: f64,
    p50: f64,
    p95: f64,
}

impl NumericStats {
    fn from_sorted(sorted: &[f64]) -> Option<Self> {
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
        Some(Self {
            min,
            max,
            mean,
            p50: quantile_sorted(sorted, 0.5)?,
            p95: quantile_sorted(sorted, 0.95)?,
        })
    }
}

/// Profile column `column` of `container`.
///
/// A column index outside the header yields an empty text profile.
pub fn profile(
    container: &DataContainer,
    column: usize,
    options: &ProfileOptions,
) -> ColumnProfile {
    let name = container.header().get(column).cloned().unwrap_or_default();
    let column_type = container.column_type(column).unwrap_or(ColumnType::Text);

    let mut counts: IndexMap<String, usize> = IndexMap::new();
    let mut nulls = 0usize;
    for row in container.rows() {
        let cell = row.get(column).unwrap_or(&NULL_CELL);
        if cell.is_missing() {
            nulls += 1;
        }
        *counts.entry(cell.key()).or_insert(0) += 1;
    }
    let uniques = counts.len();

    let mut profile = ColumnProfile {
        column: name,
        column_type,
        chart_data: Vec::new(),
        min: None,
        max: None,
        mean: None,
        p50: None,
        p95: None,
        nulls,
        uniques,
        has_outliers: false,
    };

    if column_type != ColumnType::Num {
        profile.chart_data = by_frequency(counts);
        return profile;
    }

    let mut sorted: Vec<f64> = container
        .rows()
        .iter()
        .filter_map(|row| row.get(column).and_then(Cell::as_num))
        .filter(|v| v.is_finite())
        .collect();
    sorted.sort_by(f64::total_cmp);
    let is_integer = sorted.iter().all(|v| v.fract() == 0.0);

    let Some(stats) = NumericStats::from_sorted(&sorted) else {
        // Typed numeric from the sample, but no numbers in the data.
        profile.chart_data = by_value(counts);
        return profile;
    };
    profile.min = Some(stats.min);
    profile.max = Some(stats.max);
    profile.mean = Some(stats.mean);
    profile.p50 = Some(stats.p50);
    profile.p95 = Some(stats.p95);

    let mut binning_min = stats.min;
    let mut binning_max = stats.max;
    if options.trim_outliers {
        let bucket = (stats.max - stats.min) / SKEW_BUCKETS;
        let low = stats.min + bucket * 2.0;
        let high = stats.max - bucket * 2.0;

        let removed: Vec<f64> = if stats.p50 < low {
            // Long right tail: drop the top 1%.
            let split = (sorted.len() as f64 * (1.0 - TRIM_FRACTION)).ceil() as usize;
            let removed = sorted.split_off(split.min(sorted.len()));
            binning_max = sorted.last().copied().unwrap_or(stats.max);
            removed
        } else if stats.p50 > high {
            // Long left tail: drop the bottom 1%.
            let split = (sorted.len() as f64 * TRIM_FRACTION).floor() as usize;
            let removed: Vec<f64> = sorted.drain(..split.min(sorted.len())).collect();
            binning_min = sorted.first().copied().unwrap_or(stats.min);
            removed
        } else {
            Vec::new()
        };

        for v in &removed {
            if *v != binning_min && *v != binning_max {
                counts.shift_remove(&Cell::Num(*v).key());
            }
        }
        profile.has_outliers = !removed.is_empty();
    }

    if counts.len() > BIN_COUNT {
        let binned = bin_by(sorted, |v| Some(*v), binning_min, binning_max, BIN_COUNT);
        let labels = if is_probably_year_field(&profile.column, stats.min, stats.max) {
            label_year_bins(&binned.bins, &binned.groups)
        } else {
            label_bins(&binned.bins, is_integer)
        };
        profile.chart_data = labels
            .into_iter()
            .zip(&binned.groups)
            .map(|(label, group)| DataPoint::new(label, Some(group.len() as f64)))
            .collect();
    } else {
        profile.chart_data = by_value(counts);
    }

    tracing::debug!(
        column = %profile.column,
        has_outliers = profile.has_outliers,
        bars = profile.chart_data.len(),
        "profiled numeric column"
    );
    profile
}

/// Profile every column in parallel; results are in column order.
pub fn profile_all(container: &DataContainer, options: &ProfileOptions) -> Vec<ColumnProfile> {
    (0..container.column_count())
        .into_par_iter()
        .map(|column| profile(container, column, options))
        .collect()
}

/// One point per distinct value, most frequent first (ties keep first-seen order).
fn by_frequency(counts: IndexMap<String, usize>) -> Vec<DataPoint> {
    let mut points: Vec<(String, usize)> = counts.into_iter().collect();
    points.sort_by(|a, b| b.1.cmp(&a.1));
    points
        .into_iter()
        .map(|(label, n)| DataPoint::new(label, Some(n as f64)))
        .collect()
}

/// One point per distinct value, ascending by numeric value; NULL and non-numeric keys last.
fn by_value(counts: IndexMap<String, usize>) -> Vec<DataPoint> {
    let mut points: Vec<(Option<f64>, String, usize)> = counts
        .into_iter()
        .map(|(label, n)| {
            let v = label.parse::<f64>().ok().filter(|v| v.is_finite());
            (v, label, n)
        })
        .collect();
    points.sort_by(|a, b| match (a.0, b.0) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    points
        .into_iter()
        .map(|(_, label, n)| DataPoint::new(label, Some(n as f64)))
        .collect()
}
