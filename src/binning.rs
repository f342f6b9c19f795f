//! Equal-width bucketing and bin labels.
//!
//! Numeric columns with many distinct values are split into [`BIN_COUNT`] buckets of width
//! `(max - min) / BIN_COUNT`. Labels are built by [`label_bins`], which raises the number of
//! significant digits until both ends of a range render differently.

use crate::format::{DEFAULT_PRECISION, MAX_PRECISION, format_compact, plain};
use crate::types::Bin;

/// Number of buckets used by the profiler and the aggregator.
pub const BIN_COUNT: usize = 10;

/// Items grouped into contiguous bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Binned<T> {
    pub bins: Vec<Bin>,
    pub groups: Vec<Vec<T>>,
}

/// Split `[min, max]` into `count` contiguous buckets of equal width.
///
/// The last bucket ends exactly at `max`. A degenerate range yields a single bucket.
pub fn equal_width_bins(min: f64, max: f64, count: usize) -> Vec<Bin> {
    let count = count.max(1);
    if !(max > min) {
        return vec![Bin::new(min, max)];
    }
    let width = (max - min) / count as f64;
    (0..count)
        .map(|i| {
            let x0 = min + width * i as f64;
            let x1 = if i + 1 == count {
                max
            } else {
                min + width * (i + 1) as f64
            };
            Bin::new(x0, x1)
        })
        .collect()
}

/// Index of the bin containing `v`, or `None` when `v` lies outside the bins.
pub fn bin_index(bins: &[Bin], v: f64) -> Option<usize> {
    let first = bins.first()?;
    let last = bins.last()?;
    if v.is_nan() || v < first.x0 || v > last.x1 {
        return None;
    }
    Some(bins.partition_point(|b| b.x1 <= v).min(bins.len() - 1))
}

/// Bucket `items` into `count` equal-width bins over `[min, max]`.
///
/// Items whose value is `None` or outside the domain are dropped.
pub fn bin_by<T, I, F>(items: I, value: F, min: f64, max: f64, count: usize) -> Binned<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Option<f64>,
{
    let bins = equal_width_bins(min, max, count);
    let mut groups: Vec<Vec<T>> = (0..bins.len()).map(|_| Vec::new()).collect();
    for item in items {
        if let Some(idx) = value(&item).and_then(|v| bin_index(&bins, v)) {
            groups[idx].push(item);
        }
    }
    Binned { bins, groups }
}

/// Build one label per bin.
///
/// - Integer data in a bin of width 1 gets a single-number label (`"14"`), with enough
///   digits to differ from the next integer.
/// - Integer data in bins of width `[1, 5)` ends the range at `x1 - 1` so it reads as
///   inclusive (`"2 - 3"` for `[2, 4)`); the last bin keeps its upper bound.
/// - Otherwise `"A - B"` with [`format_compact`], adding digits until `A != B`.
///
/// ```
/// use data_explorer::binning::label_bins;
/// use data_explorer::types::Bin;
///
/// let bins = [Bin::new(0.0, 2.0), Bin::new(2.0, 4.0), Bin::new(4.0, 5.0)];
/// assert_eq!(label_bins(&bins, true), vec!["0 - 1", "2 - 3", "4"]);
/// ```
pub fn label_bins(bins: &[Bin], is_integer: bool) -> Vec<String> {
    let last = bins.len().saturating_sub(1);
    bins.iter()
        .enumerate()
        .map(|(i, bin)| label_bin(bin, is_integer, i == last))
        .collect()
}

fn label_bin(bin: &Bin, is_integer: bool, is_last: bool) -> String {
    let width = bin.width();
    if is_integer && width == 1.0 {
        return single_label(bin.x0);
    }

    let hi = if is_integer && !is_last && (1.0..5.0).contains(&width) {
        bin.x1 - 1.0
    } else {
        bin.x1
    };
    let (a, b) = escalate(bin.x0, hi);
    format!("{a} - {b}")
}

/// A single integer label, precise enough to tell `v` from `v + 1` (`1M` vs `1.000001M`).
fn single_label(v: f64) -> String {
    escalate(v, v + 1.0).0
}

/// Format both values at the lowest precision (from [`DEFAULT_PRECISION`]) that renders
/// them differently, capped at [`MAX_PRECISION`].
fn escalate(lo: f64, hi: f64) -> (String, String) {
    let mut precision = DEFAULT_PRECISION;
    loop {
        let a = format_compact(lo, precision);
        let b = format_compact(hi, precision);
        if a != b || precision >= MAX_PRECISION {
            return (a, b);
        }
        precision += 1;
    }
}

/// Labels for pre-grouped values: the value itself when a group holds a single distinct
/// value, else `"min - max"`. Values are printed verbatim (no suffixes, no rounding).
///
/// Empty groups get an empty label; see [`label_year_bins`] for a variant that falls back to
/// the bin edges.
pub fn label_simple_bins(groups: &[Vec<f64>]) -> Vec<String> {
    groups.iter().map(|g| simple_label(g).unwrap_or_default()).collect()
}

fn simple_label(values: &[f64]) -> Option<String> {
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    if min == max {
        Some(plain(min))
    } else {
        Some(format!("{} - {}", plain(min), plain(max)))
    }
}

/// [`label_simple_bins`] for year-like columns, labelling empty groups by their whole-year
/// bin edges so every label stays meaningful.
pub fn label_year_bins(bins: &[Bin], groups: &[Vec<f64>]) -> Vec<String> {
    let last = bins.len().saturating_sub(1);
    bins.iter()
        .zip(groups)
        .enumerate()
        .map(|(i, (bin, values))| {
            simple_label(values).unwrap_or_else(|| {
                let lo = bin.x0.ceil();
                let hi = if i == last {
                    bin.x1.floor()
                } else {
                    bin.x1.ceil() - 1.0
                };
                if lo < hi {
                    format!("{} - {}", plain(lo), plain(hi))
                } else if lo == hi {
                    plain(lo)
                } else {
                    format!("{} - {}", plain(bin.x0), plain(bin.x1))
                }
            })
        })
        .collect()
}

/// True when a column looks like it holds years: its name mentions "year"/"yr" and its
/// range lies strictly within `(1500, 2100)`.
pub fn is_probably_year_field(name: &str, min: f64, max: f64) -> bool {
    let name = name.to_lowercase();
    let name_match = name.contains("year") || name.contains("yr");
    name_match && min > 1500.0 && max < 2100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bins(ranges: &[(f64, f64)]) -> Vec<Bin> {
        ranges.iter().map(|&(x0, x1)| Bin::new(x0, x1)).collect()
    }

    #[test]
    fn labels_integer_bins_inclusively() {
        let bins = make_bins(&[
            (0.0, 2.0),
            (2.0, 4.0),
            (4.0, 6.0),
            (6.0, 8.0),
            (8.0, 10.0),
            (10.0, 12.0),
            (12.0, 14.0),
            (14.0, 15.0),
        ]);
        assert_eq!(
            label_bins(&bins, true),
            vec![
                "0 - 1", "2 - 3", "4 - 5", "6 - 7", "8 - 9", "10 - 11", "12 - 13", "14"
            ]
        );
    }

    #[test]
    fn labels_thousands_ranges() {
        let mut ranges: Vec<(f64, f64)> = (0..14)
            .map(|i| (i as f64 * 1000.0, (i + 1) as f64 * 1000.0))
            .collect();
        ranges.push((14000.0, 14137.0));
        let labels = label_bins(&make_bins(&ranges), true);
        assert_eq!(labels[0], "0 - 1K");
        assert_eq!(labels[1], "1K - 2K");
        assert_eq!(labels[9], "9K - 10K");
        assert_eq!(labels[14], "14K - 14.1K");
    }

    #[test]
    fn labels_millions_ranges() {
        let bins = make_bins(&[(0.0, 1e6), (6e6, 7e6), (7e6, 7_103_086.0)]);
        assert_eq!(label_bins(&bins, true), vec!["0 - 1M", "6M - 7M", "7M - 7.1M"]);
    }

    #[test]
    fn labels_tiny_ranges_without_collapsing() {
        let bins = make_bins(&[
            (0.0, 0.00002),
            (0.00002, 0.00004),
            (0.00004, 0.00006),
            (0.00006, 0.00008),
        ]);
        assert_eq!(
            label_bins(&bins, true),
            vec![
                "0 - 0.00002",
                "0.00002 - 0.00004",
                "0.00004 - 0.00006",
                "0.00006 - 0.00008"
            ]
        );
    }

    #[test]
    fn escalates_precision_for_narrow_ranges() {
        let bins = make_bins(&[(1.0001, 1.0002)]);
        assert_eq!(label_bins(&bins, false), vec!["1.0001 - 1.0002"]);
    }

    #[test]
    fn fractional_edges_on_integer_data() {
        // Range 0..15 in ten buckets of width 1.5.
        let bins = equal_width_bins(0.0, 15.0, 10);
        let labels = label_bins(&bins, true);
        assert_eq!(labels[0], "0 - 0.5");
        assert_eq!(labels[1], "1.5 - 2");
        assert_eq!(labels[9], "13.5 - 15");
    }

    #[test]
    fn single_integer_labels_gain_digits_at_large_magnitudes() {
        let bins = equal_width_bins(1_000_000.0, 1_000_010.0, 10);
        let labels = label_bins(&bins, true);
        assert_eq!(labels[0], "1M");
        assert_eq!(labels[1], "1.000001M");
        assert_eq!(labels[9], "1.000009M");
        for pair in labels.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn single_integer_labels_stay_short_when_possible() {
        let bins = equal_width_bins(20.0, 30.0, 10);
        let labels = label_bins(&bins, true);
        assert_eq!(labels[0], "20");
        assert_eq!(labels[9], "29");
    }

    #[test]
    fn equal_width_bins_are_contiguous() {
        let bins = equal_width_bins(0.0, 999.0, BIN_COUNT);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].x0, 0.0);
        assert_eq!(bins[9].x1, 999.0);
        for pair in bins.windows(2) {
            assert_eq!(pair[0].x1, pair[1].x0);
        }
    }

    #[test]
    fn degenerate_range_is_one_bin() {
        assert_eq!(equal_width_bins(3.0, 3.0, 10), vec![Bin::new(3.0, 3.0)]);
    }

    #[test]
    fn last_bin_includes_max() {
        let binned = bin_by(vec![0.0, 5.0, 9.99, 10.0], |v| Some(*v), 0.0, 10.0, 2);
        assert_eq!(binned.groups, vec![vec![0.0], vec![5.0, 9.99, 10.0]]);
    }

    #[test]
    fn values_outside_domain_are_dropped() {
        let binned = bin_by(vec![-1.0, 1.0, 11.0, f64::NAN], |v| Some(*v), 0.0, 10.0, 5);
        let total: usize = binned.groups.iter().map(Vec::len).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn simple_labels() {
        let groups = vec![vec![2001.0, 2001.0], vec![2002.0, 2004.0, 2003.0], vec![]];
        assert_eq!(label_simple_bins(&groups), vec!["2001", "2002 - 2004", ""]);
    }

    #[test]
    fn year_labels_fall_back_to_edges() {
        let bins = equal_width_bins(2000.0, 2020.0, 4);
        let groups = vec![vec![2000.0, 2003.0], vec![], vec![2012.0], vec![2020.0]];
        assert_eq!(
            label_year_bins(&bins, &groups),
            vec!["2000 - 2003", "2005 - 2009", "2012", "2020"]
        );
    }

    #[test]
    fn year_field_heuristic() {
        assert!(is_probably_year_field("Year", 1990.0, 2020.0));
        assert!(is_probably_year_field("model_yr", 1990.0, 2020.0));
        assert!(!is_probably_year_field("count", 1990.0, 2020.0));
        assert!(!is_probably_year_field("year", 0.0, 2020.0));
        assert!(!is_probably_year_field("year", 1990.0, 2100.0));
    }
}
