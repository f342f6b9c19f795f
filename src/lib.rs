//! `data-explorer` profiles and aggregates a tabular dataset held in memory, the kind of data
//! a user pipes in as CSV to get a quick look at it.
//!
//! The primary entrypoints are:
//!
//! - [`ingestion::ingest_csv_from_path`] / [`ingestion::ingest_csv_from_reader`]: CSV text into
//!   a [`container::DataContainer`] (header row, rows of [`types::Cell`]s, inferred column types)
//! - [`profile::profile`] / [`profile::profile_all`]: a per-column overview with summary
//!   statistics and a histogram or frequency chart
//! - [`analysis::aggregate`]: group rows by an X column (optionally per facet) and reduce a Y
//!   column into chart-ready series
//!
//! ## Column types
//!
//! Types are inferred once, from a random sample of up to [`inference::SAMPLE_SIZE`] rows:
//!
//! - [`types::ColumnType::Date`]: every sampled cell looks like `YYYY-MM-DD[ HH:MM:SS]` or
//!   `M/D/YYYY`
//! - [`types::ColumnType::Num`]: every sampled non-null cell is a number
//! - [`types::ColumnType::Text`]: everything else
//!
//! Across the crate, empty CSV fields are [`types::Cell::Null`] and are counted under the
//! [`types::NULL`] key (as is the literal string `"null"`).
//!
//! ## Quick example: profile a column
//!
//! ```rust
//! use data_explorer::ingestion::{ingest_csv_from_reader, CsvOptions};
//! use data_explorer::profile::{profile, ProfileOptions};
//!
//! # fn main() -> Result<(), data_explorer::ExplorerError> {
//! let input = "name,score\nAda,98.5\nBob,71\nCyd,\n";
//! let dc = ingest_csv_from_reader(input.as_bytes(), &CsvOptions::default())?;
//!
//! let overview = profile(&dc, 1, &ProfileOptions::default());
//! assert_eq!(overview.nulls, 1);
//! assert_eq!(overview.max, Some(98.5));
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: chart config to series
//!
//! ```rust
//! use data_explorer::analysis::aggregate;
//! use data_explorer::config::ChartConfig;
//! use data_explorer::ingestion::{ingest_csv_from_reader, CsvOptions};
//!
//! # fn main() -> Result<(), data_explorer::ExplorerError> {
//! let input = "day,region,units\n2021-01-04,north,3\n2021-01-19,south,5\n2021-02-02,north,2\n";
//! let dc = ingest_csv_from_reader(input.as_bytes(), &CsvOptions::default())?;
//!
//! let config: ChartConfig =
//!     serde_json::from_str(r#"{"x": "day", "y": "units", "yAgg": "sum", "dateAgg": "month"}"#)?;
//! let facets = aggregate(&dc, &config.resolve(&dc)?).unwrap_or_default();
//! let sums: Vec<Option<f64>> = facets[0].values.iter().map(|p| p.value).collect();
//! assert_eq!(sums, vec![Some(8.0), Some(2.0)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV row source and ingestion observers
//! - [`container`]: the loaded dataset
//! - [`inference`]: sampling-based type inference
//! - [`profile`]: column overviews
//! - [`analysis`]: group-by aggregation into facet series
//! - [`config`]: user-facing chart configuration and the JSON data payload
//! - [`processing`]: reduce operations and quantiles
//! - [`binning`] / [`format`]: equal-width bins and their human-readable labels
//! - [`logging`]: `tracing` subscriber set-up
//! - [`error`]: the crate error type

pub mod analysis;
pub mod binning;
pub mod config;
pub mod container;
pub mod error;
pub mod format;
pub mod inference;
pub mod ingestion;
pub mod logging;
pub mod processing;
pub mod profile;
pub mod types;

pub use error::{ExplorerError, ExplorerResult};
