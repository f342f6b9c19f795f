//! The loaded dataset: header, rows, and column types inferred once at construction.

use rand::Rng;

use crate::error::{ExplorerError, ExplorerResult};
use crate::inference::TypeInference;
use crate::types::{Cell, ColumnType, Row};

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Cell>>` in header order and never change after construction.
/// Column types are inferred eagerly in the constructor, so every reader observes the same
/// classification even though inference samples rows at random.
#[derive(Debug, Clone, PartialEq)]
pub struct DataContainer {
    header: Vec<String>,
    rows: Vec<Row>,
    types: Vec<ColumnType>,
}

impl DataContainer {
    /// Build a container from a parsed row matrix whose first row is the header.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::EmptyInput`] when `data` has no header row.
    ///
    /// ```
    /// use data_explorer::container::DataContainer;
    /// use data_explorer::types::{Cell, ColumnType};
    ///
    /// # fn main() -> Result<(), data_explorer::ExplorerError> {
    /// let dc = DataContainer::new(vec![
    ///     vec![Cell::from("name"), Cell::from("score")],
    ///     vec![Cell::from("Ada"), Cell::Num(98.5)],
    ///     vec![Cell::from("Bob"), Cell::Num(71.0)],
    /// ])?;
    /// assert_eq!(dc.types(), &[ColumnType::Text, ColumnType::Num]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(data: Vec<Row>) -> ExplorerResult<Self> {
        Self::with_rng(data, &mut rand::rng())
    }

    /// Same as [`DataContainer::new`], drawing the inference sample from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(data: Vec<Row>, rng: &mut R) -> ExplorerResult<Self> {
        let mut data = data.into_iter();
        let header_row = data.next().ok_or(ExplorerError::EmptyInput)?;
        let header = header_row.iter().map(Cell::to_string).collect();
        Ok(Self::from_parts_with_rng(header, data.collect(), rng))
    }

    /// Build a container from a header and data rows.
    pub fn from_parts(header: Vec<String>, rows: Vec<Row>) -> Self {
        Self::from_parts_with_rng(header, rows, &mut rand::rng())
    }

    /// Same as [`DataContainer::from_parts`], drawing the inference sample from `rng`.
    ///
    /// Rows shorter than the header are padded with [`Cell::Null`]; longer rows are cut to
    /// the header width.
    pub fn from_parts_with_rng<R: Rng + ?Sized>(
        header: Vec<String>,
        mut rows: Vec<Row>,
        rng: &mut R,
    ) -> Self {
        let width = header.len();
        let mut ragged = 0usize;
        for row in rows.iter_mut().filter(|row| row.len() != width) {
            ragged += 1;
            row.resize(width, Cell::Null);
        }
        if ragged > 0 {
            tracing::warn!(ragged, width, "normalized rows whose length differs from the header");
        }

        let types = TypeInference::infer(&header, &rows, rng);
        Self {
            header,
            rows,
            types,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Column types, one per header column. Always the same slice for a given container.
    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn column_type(&self, column: usize) -> Option<ColumnType> {
        self.types.get(column).copied()
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}
