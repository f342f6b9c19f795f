//! Core data model types.
//!
//! Rows are plain `Vec<Cell>` in header order. A [`Cell`] is the explicit form of a loosely
//! typed CSV value: the row source has already decided whether a value is a number.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Sentinel key that absent values (and the literal string `"null"`) are counted under.
pub const NULL: &str = "NULL";

/// Shared stand-in for cells missing from short rows.
pub(crate) static NULL_CELL: Cell = Cell::Null;

/// A single cell of the row matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Missing/empty value.
    Null,
    /// A value the row source cast to a number.
    Num(f64),
    /// Any other value, kept verbatim.
    Text(String),
}

impl Cell {
    /// Returns the numeric value if the row source cast this cell to a number.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Cell::Num(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value for text cells.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// `Null`, or the literal text `"null"` some exporters write for it.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s == "null",
            Cell::Num(_) => false,
        }
    }

    /// Key used for frequency counting and faceting.
    ///
    /// Missing cells map to [`NULL`]; numbers use their shortest decimal form
    /// (`2.0` -> `"2"`).
    pub fn key(&self) -> String {
        if self.is_missing() {
            return NULL.to_string();
        }
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Num(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Num(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Num(v as f64)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Null)
    }
}

/// The numeric predicate shared by type inference, profiling, and aggregation.
///
/// Only cells the row source already cast to numbers count; numeric-looking strings do not.
pub fn is_numeric(cell: &Cell) -> bool {
    matches!(cell, Cell::Num(_))
}

/// A single row of cells, in header order.
pub type Row = Vec<Cell>;

/// Inferred logical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Date,
    Num,
    Text,
}

impl ColumnType {
    /// Short badge shown next to a column name.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Date => "Date",
            ColumnType::Num => "Num",
            ColumnType::Text => "Text",
        }
    }
}

/// Label of a chart point: a category/bin label or a truncated date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Label {
    Text(String),
    Date(NaiveDateTime),
}

impl Label {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Label::Text(s) => Some(s.as_str()),
            Label::Date(_) => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Text(s) => f.write_str(s),
            Label::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Label {
    fn from(v: &str) -> Self {
        Label::Text(v.to_string())
    }
}

impl From<String> for Label {
    fn from(v: String) -> Self {
        Label::Text(v)
    }
}

/// One chart-ready point. `value` is `None` for an empty group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: Label,
    pub value: Option<f64>,
}

impl DataPoint {
    pub fn new(label: impl Into<Label>, value: Option<f64>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A numeric bucket `[x0, x1)`; the last bucket of a sequence also includes `x1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub x0: f64,
    pub x1: f64,
}

impl Bin {
    pub fn new(x0: f64, x1: f64) -> Self {
        Self { x0, x1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_literal_null_share_a_key() {
        assert_eq!(Cell::Null.key(), NULL);
        assert_eq!(Cell::from("null").key(), NULL);
        assert_eq!(Cell::from("NULL").key(), NULL);
        assert_eq!(Cell::from("nil").key(), "nil");
    }

    #[test]
    fn numeric_keys_use_shortest_form() {
        assert_eq!(Cell::Num(2.0).key(), "2");
        assert_eq!(Cell::Num(-1.5).key(), "-1.5");
    }

    #[test]
    fn numeric_predicate_ignores_numeric_looking_text() {
        assert!(is_numeric(&Cell::Num(1.0)));
        assert!(!is_numeric(&Cell::from("1")));
        assert!(!is_numeric(&Cell::Null));
    }

    #[test]
    fn cells_serialize_untagged() {
        let row: Row = vec![Cell::Null, Cell::Num(1.5), Cell::from("a")];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"[null,1.5,"a"]"#);
        let back: Row = serde_json::from_str(r#"[null,1.5,"a"]"#).unwrap();
        assert_eq!(back, row);
    }
}
