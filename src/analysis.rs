//! Group-by analysis: group rows by X (optionally per facet), reduce Y in each group, and
//! return one chart-ready series per facet.
//!
//! ```
//! use data_explorer::analysis::{aggregate, AnalysisConfig};
//! use data_explorer::container::DataContainer;
//! use data_explorer::processing::ReduceOp;
//! use data_explorer::types::Cell;
//!
//! # fn main() -> Result<(), data_explorer::ExplorerError> {
//! let dc = DataContainer::new(vec![
//!     vec![Cell::from("city"), Cell::from("sales")],
//!     vec![Cell::from("Oslo"), Cell::Num(10.0)],
//!     vec![Cell::from("Lima"), Cell::Num(30.0)],
//!     vec![Cell::from("Oslo"), Cell::Num(5.0)],
//! ])?;
//! let config = AnalysisConfig {
//!     x: Some(0),
//!     y: Some(1),
//!     y_agg: Some(ReduceOp::Sum),
//!     ..Default::default()
//! };
//! let facets = aggregate(&dc, &config).unwrap_or_default();
//! assert_eq!(facets.len(), 1);
//! assert_eq!(facets[0].values[0].value, Some(30.0));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::binning::{BIN_COUNT, bin_by, is_probably_year_field, label_bins, label_year_bins};
use crate::container::DataContainer;
use crate::error::ExplorerError;
use crate::processing::{ReduceOp, reduce_group};
use crate::types::{Cell, ColumnType, DataPoint, Label, NULL_CELL, Row};

/// Granularity that date X values are truncated to before grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateAgg {
    Year,
    Month,
    #[default]
    Day,
}

impl DateAgg {
    pub fn name(&self) -> &'static str {
        match self {
            DateAgg::Year => "year",
            DateAgg::Month => "month",
            DateAgg::Day => "day",
        }
    }
}

impl fmt::Display for DateAgg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DateAgg {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "year" => Ok(DateAgg::Year),
            "month" => Ok(DateAgg::Month),
            "day" => Ok(DateAgg::Day),
            _ => Err(ExplorerError::InvalidOption {
                option: "date granularity",
                value: s.to_string(),
            }),
        }
    }
}

/// Resolved analysis request. Columns are header indices.
///
/// `y_agg` defaults to [`ReduceOp::First`] and `date_agg` to [`DateAgg::Day`] when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    pub x: Option<usize>,
    pub y: Option<usize>,
    pub y_agg: Option<ReduceOp>,
    pub date_agg: Option<DateAgg>,
    pub facet: Option<usize>,
}

/// Which column is on which axis, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    pub index: usize,
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_agg: Option<DateAgg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartFieldsMeta {
    pub x: FieldMeta,
    pub y: FieldMeta,
}

impl AnalysisConfig {
    /// Axis metadata for the renderer, or `None` until both axes are chosen.
    pub fn fields_meta(&self, container: &DataContainer) -> Option<ChartFieldsMeta> {
        let (x, y) = (self.x?, self.y?);
        Some(ChartFieldsMeta {
            x: FieldMeta {
                index: x,
                column_type: container.column_type(x)?,
                date_agg: self.date_agg,
            },
            y: FieldMeta {
                index: y,
                column_type: container.column_type(y)?,
                date_agg: None,
            },
        })
    }
}

/// One chart: the series for a single facet value (`""` when not faceting).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetResult {
    pub key: String,
    pub values: Vec<DataPoint>,
}

/// Parse a date cell. Returns `None` for anything unparseable.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS[.fff]]` (space or `T`), RFC 3339 with an
/// offset (kept as written), and `M/D/YYYY`.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    const DATE_TIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

    let s = raw.trim();
    if let Some(d) = DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(d);
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.naive_local());
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Truncate to midnight, then to the first of the month or of the year.
pub fn truncate_date(d: NaiveDateTime, agg: DateAgg) -> Option<NaiveDateTime> {
    let date = d.date();
    let date = match agg {
        DateAgg::Day => date,
        DateAgg::Month => date.with_day(1)?,
        DateAgg::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?,
    };
    date.and_hms_opt(0, 0, 0)
}

/// Run an analysis.
///
/// Returns `None` until both `x` and `y` are set. Otherwise returns one [`FacetResult`] per
/// facet value in first-seen order; facets without a single usable X value are left out.
///
/// - Date X values are truncated per `date_agg`; unparseable dates are skipped.
/// - Numeric X with more than [`BIN_COUNT`] distinct values is re-grouped into
///   [`BIN_COUNT`] equal-width bins (empty bins keep a `None` value, except for `count`).
/// - Text X series are sorted by value, largest first; numeric and date series ascend.
pub fn aggregate(container: &DataContainer, config: &AnalysisConfig) -> Option<Vec<FacetResult>> {
    let (x, y) = (config.x?, config.y?);
    let op = config.y_agg.unwrap_or_default();
    let date_agg = config.date_agg.unwrap_or_default();
    let x_type = container.column_type(x).unwrap_or(ColumnType::Text);
    let x_name = container.header().get(x).map(String::as_str).unwrap_or("");

    let grouping = Grouping {
        x,
        y,
        x_type,
        x_name,
        op,
        date_agg,
    };

    let facets: Vec<FacetResult> = partition_facets(container.rows(), config.facet)
        .into_iter()
        .filter_map(|(key, rows)| grouping.series(&rows).map(|values| FacetResult { key, values }))
        .collect();

    tracing::debug!(
        x,
        y,
        op = %op,
        facets = facets.len(),
        "aggregated analysis"
    );
    Some(facets)
}

/// Group rows by facet value, first-seen order. Without a facet column every row lands in
/// the `""` facet.
fn partition_facets(rows: &[Row], facet: Option<usize>) -> IndexMap<String, Vec<&Row>> {
    let mut out: IndexMap<String, Vec<&Row>> = IndexMap::new();
    match facet {
        None => {
            out.insert(String::new(), rows.iter().collect());
        }
        Some(col) => {
            for row in rows {
                let key = row.get(col).unwrap_or(&NULL_CELL).key();
                out.entry(key).or_default().push(row);
            }
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
enum XKey {
    Num(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl XKey {
    fn id(&self) -> String {
        match self {
            XKey::Num(v) => v.to_string(),
            XKey::Date(d) => d.to_string(),
            XKey::Text(s) => s.clone(),
        }
    }

    fn into_label(self) -> Label {
        match self {
            XKey::Num(v) => Label::Text(v.to_string()),
            XKey::Date(d) => Label::Date(d),
            XKey::Text(s) => Label::Text(s),
        }
    }
}

struct Grouping<'a> {
    x: usize,
    y: usize,
    x_type: ColumnType,
    x_name: &'a str,
    op: ReduceOp,
    date_agg: DateAgg,
}

impl Grouping<'_> {
    /// Grouping key of the X cell, or `None` when the row is skipped.
    fn x_key(&self, cell: &Cell) -> Option<XKey> {
        match (self.x_type, cell) {
            (_, Cell::Null) => None,
            (ColumnType::Date, Cell::Text(s)) => {
                parse_date(s).and_then(|d| truncate_date(d, self.date_agg)).map(XKey::Date)
            }
            (ColumnType::Date, _) => None,
            (ColumnType::Num, Cell::Num(v)) if v.is_finite() => Some(XKey::Num(*v)),
            (ColumnType::Num, _) => None,
            (ColumnType::Text, other) => Some(XKey::Text(other.to_string())),
        }
    }

    /// Series for one facet, or `None` when no row had a usable X value.
    fn series(&self, rows: &[&Row]) -> Option<Vec<DataPoint>> {
        let mut groups: IndexMap<String, (XKey, Vec<&Row>)> = IndexMap::new();
        for &row in rows {
            let Some(key) = self.x_key(row.get(self.x).unwrap_or(&NULL_CELL)) else {
                continue;
            };
            groups
                .entry(key.id())
                .or_insert_with(|| (key, Vec::new()))
                .1
                .push(row);
        }
        if groups.is_empty() {
            return None;
        }

        if self.x_type == ColumnType::Num && groups.len() > BIN_COUNT {
            return Some(self.binned_series(rows.iter().copied()));
        }

        let mut entries: Vec<(XKey, Vec<&Row>)> = groups.into_values().collect();
        entries.sort_by(|a, b| match (&a.0, &b.0) {
            (XKey::Num(l), XKey::Num(r)) => l.total_cmp(r),
            (XKey::Date(l), XKey::Date(r)) => l.cmp(r),
            _ => std::cmp::Ordering::Equal,
        });

        let mut points: Vec<DataPoint> = entries
            .into_iter()
            .map(|(key, group)| DataPoint {
                value: reduce_group(&group, self.y, self.op),
                label: key.into_label(),
            })
            .collect();

        if self.x_type == ColumnType::Text {
            points.sort_by(|a, b| match (a.value, b.value) {
                (Some(l), Some(r)) => r.total_cmp(&l),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
        }
        Some(points)
    }

    /// Re-group rows with numeric X into equal-width bins over the observed X range.
    fn binned_series<'r>(&self, rows: impl Iterator<Item = &'r Row>) -> Vec<DataPoint> {
        let x = self.x;
        let x_of = |row: &&Row| row.get(x).and_then(Cell::as_num).filter(|v| v.is_finite());

        let rows: Vec<&Row> = rows.collect();
        let (min, max) = rows
            .iter()
            .filter_map(x_of)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let is_integer = rows.iter().filter_map(x_of).all(|v| v.fract() == 0.0);

        let binned = bin_by(rows, x_of, min, max, BIN_COUNT);
        let labels = if is_probably_year_field(self.x_name, min, max) {
            let values: Vec<Vec<f64>> = binned
                .groups
                .iter()
                .map(|group| group.iter().filter_map(x_of).collect())
                .collect();
            label_year_bins(&binned.bins, &values)
        } else {
            label_bins(&binned.bins, is_integer)
        };

        labels
            .into_iter()
            .zip(&binned.groups)
            .map(|(label, group)| DataPoint::new(label, reduce_group(group, self.y, self.op)))
            .collect()
    }
}
