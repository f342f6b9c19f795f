//! Sampling-based column type inference.
//!
//! A fixed-size random sample of rows is scanned once per column. A column is a `date` while
//! every sampled cell looks like a date, a `num` while every sampled non-null cell is a number,
//! and `text` otherwise.

use std::sync::LazyLock;

use rand::Rng;
use rand::seq::index;
use regex::Regex;

use crate::types::{Cell, ColumnType, NULL_CELL, Row, is_numeric};

/// Number of rows sampled per dataset.
pub const SAMPLE_SIZE: usize = 100;

static DATE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})( ([0-9]{2}):([0-9]{2}):([0-9]{2}))?")
        .expect("valid date-time regex")
});

static DATE_SIMPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$").expect("valid m/d/y regex")
});

/// True when a cell matches one of the recognised date shapes
/// (`YYYY-MM-DD[ HH:MM:SS]...` or `M/D/YYYY`). Null and numeric cells never match.
pub fn looks_like_date(cell: &Cell) -> bool {
    match cell {
        Cell::Text(s) => DATE_TIME_RE.is_match(s) || DATE_SIMPLE_RE.is_match(s),
        _ => false,
    }
}

/// Column type inference over a random row sample.
pub struct TypeInference;

impl TypeInference {
    /// Infer one [`ColumnType`] per header column from a sample drawn with `rng`.
    pub fn infer<R: Rng + ?Sized>(header: &[String], rows: &[Row], rng: &mut R) -> Vec<ColumnType> {
        let amount = SAMPLE_SIZE.min(rows.len());
        let sample: Vec<&Row> = index::sample(rng, rows.len(), amount)
            .into_iter()
            .map(|i| &rows[i])
            .collect();

        let types: Vec<ColumnType> = (0..header.len())
            .map(|col| Self::classify(sample.iter().map(|row| row.get(col).unwrap_or(&NULL_CELL))))
            .collect();

        tracing::debug!(
            rows = rows.len(),
            sampled = sample.len(),
            ?types,
            "inferred column types"
        );
        types
    }

    /// Classify a column from its sampled cells.
    ///
    /// Date candidacy fails on the first non-date cell (nulls included); numeric candidacy
    /// fails on the first non-null, non-numeric cell and needs at least one number. An empty
    /// sample is `text`.
    pub fn classify<'a, I>(cells: I) -> ColumnType
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let mut seen = false;
        let mut is_date = true;
        let mut is_num = true;
        let mut saw_num = false;

        for cell in cells {
            seen = true;
            if is_date && !looks_like_date(cell) {
                is_date = false;
            }
            if is_num {
                match cell {
                    Cell::Null => {}
                    c if is_numeric(c) => saw_num = true,
                    _ => is_num = false,
                }
            }
            if !is_date && !is_num {
                break;
            }
        }

        if !seen {
            ColumnType::Text
        } else if is_date {
            ColumnType::Date
        } else if is_num && saw_num {
            ColumnType::Num
        } else {
            ColumnType::Text
        }
    }
}
