//! Reduction operations over a group of rows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;
use crate::types::Cell;

/// Built-in aggregate functions applied to the Y values of one X group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReduceOp {
    /// Y of the first row in the group.
    #[default]
    First,
    /// Number of rows in the group (regardless of Y).
    Count,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
    /// Sum of numeric values, ignoring nulls.
    Sum,
    /// Arithmetic mean of numeric values.
    Mean,
    /// 50th percentile.
    Median,
    /// 5th percentile.
    P5,
    /// 95th percentile.
    P95,
}

impl ReduceOp {
    pub const ALL: [ReduceOp; 9] = [
        ReduceOp::First,
        ReduceOp::Count,
        ReduceOp::Min,
        ReduceOp::Max,
        ReduceOp::Sum,
        ReduceOp::Mean,
        ReduceOp::Median,
        ReduceOp::P5,
        ReduceOp::P95,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReduceOp::First => "first",
            ReduceOp::Count => "count",
            ReduceOp::Min => "min",
            ReduceOp::Max => "max",
            ReduceOp::Sum => "sum",
            ReduceOp::Mean => "mean",
            ReduceOp::Median => "median",
            ReduceOp::P5 => "p5",
            ReduceOp::P95 => "p95",
        }
    }
}

impl fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReduceOp {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ReduceOp::ALL
            .into_iter()
            .find(|op| op.name() == lower)
            .ok_or_else(|| ExplorerError::InvalidOption {
                option: "aggregate",
                value: s.to_string(),
            })
    }
}

/// Reduce column `column` of `rows` with `op`.
///
/// - `Count` always returns the number of rows, even when no Y value is numeric.
/// - Every other op returns `None` for an empty group.
/// - `First` returns the first row's Y when it is numeric, `None` otherwise.
/// - The remaining ops ignore non-numeric cells and return `None` when none are left.
pub fn reduce_group<R: AsRef<[Cell]>>(rows: &[R], column: usize, op: ReduceOp) -> Option<f64> {
    if op == ReduceOp::Count {
        return Some(rows.len() as f64);
    }
    if op == ReduceOp::First {
        return rows.first()?.as_ref().get(column)?.as_num();
    }

    let values = rows
        .iter()
        .filter_map(|row| row.as_ref().get(column).and_then(Cell::as_num));
    reduce_values(values, op)
}

/// Reduce a stream of numbers with `op`. Returns `None` when the stream is empty.
pub fn reduce_values<I>(values: I, op: ReduceOp) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut values = values.into_iter().filter(|v| !v.is_nan());
    match op {
        ReduceOp::Count => Some(values.count() as f64),
        ReduceOp::First => values.next(),
        ReduceOp::Min => values.reduce(f64::min),
        ReduceOp::Max => values.reduce(f64::max),
        ReduceOp::Sum => values.reduce(|a, b| a + b),
        ReduceOp::Mean => {
            let (count, total) = values.fold((0usize, 0.0), |(n, t), v| (n + 1, t + v));
            (count > 0).then(|| total / count as f64)
        }
        ReduceOp::Median | ReduceOp::P5 | ReduceOp::P95 => {
            let p = match op {
                ReduceOp::Median => 0.5,
                ReduceOp::P5 => 0.05,
                _ => 0.95,
            };
            let mut sorted: Vec<f64> = values.collect();
            sorted.sort_by(f64::total_cmp);
            quantile_sorted(&sorted, p)
        }
    }
}

/// Linear-interpolated quantile of an ascending slice (`p` in `[0, 1]`).
///
/// Uses the `(n - 1) * p` rank, so `p = 0.5` of `[1, 2, 3, 4]` is `2.5`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let (&first, &last) = (sorted.first()?, sorted.last()?);
    if p <= 0.0 || sorted.len() < 2 {
        return Some(first);
    }
    if p >= 1.0 {
        return Some(last);
    }
    let rank = (sorted.len() - 1) as f64 * p;
    let i0 = rank.floor() as usize;
    let v0 = sorted[i0];
    let v1 = sorted[(i0 + 1).min(sorted.len() - 1)];
    Some(v0 + (v1 - v0) * (rank - i0 as f64))
}
