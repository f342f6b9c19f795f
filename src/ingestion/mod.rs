//! Row source: CSV text into a header-first `Vec<Vec<Cell>>`, with numeric casting.
//!
//! Most callers should use [`ingest_csv_from_path`] or [`ingest_csv_from_reader`], which:
//!
//! - read the header row and cast every data field with [`csv::parse_cell`]
//! - build a [`crate::container::DataContainer`] (column types are inferred there)
//! - optionally report success/failure/alerts to an [`IngestionObserver`]

pub mod csv;
pub mod observability;

pub use self::csv::{
    CsvOptions, ingest_csv_from_path, ingest_csv_from_reader, parse_cell, read_rows_from_path,
    read_rows_from_reader,
};
pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
