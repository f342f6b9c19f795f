//! CSV row source.

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::container::DataContainer;
use crate::error::{ExplorerError, ExplorerResult};
use crate::types::{Cell, Row};

use super::observability::{
    IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, report,
};

/// Options controlling CSV ingestion.
///
/// Use [`Default`] for comma-separated input without an observer.
#[derive(Clone)]
pub struct CsvOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for CsvOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvOptions")
            .field("delimiter", &(self.delimiter as char))
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Cast one raw CSV field.
///
/// - Empty (after trimming) -> [`Cell::Null`]
/// - Finite numbers (`42`, `-1.5`, `1e3`) -> [`Cell::Num`]
/// - Anything else, including `NaN` and `inf`, -> [`Cell::Text`]
pub fn parse_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cell::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Num(v),
        _ => Cell::Text(trimmed.to_owned()),
    }
}

/// Read a CSV file into a row matrix, header row first.
///
/// Header names are kept verbatim (trimmed); data fields go through [`parse_cell`]. Rows may
/// have differing lengths; [`DataContainer`] normalizes them.
pub fn read_rows_from_path(
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> ExplorerResult<Vec<Row>> {
    let rdr = reader_builder(options).from_path(path)?;
    read_rows(rdr)
}

/// Same as [`read_rows_from_path`] for any reader (e.g. a locked stdin).
pub fn read_rows_from_reader<R: Read>(reader: R, options: &CsvOptions) -> ExplorerResult<Vec<Row>> {
    read_rows(reader_builder(options).from_reader(reader))
}

/// Ingest a CSV file into a [`DataContainer`].
///
/// ```no_run
/// use data_explorer::ingestion::{ingest_csv_from_path, CsvOptions};
///
/// # fn main() -> Result<(), data_explorer::ExplorerError> {
/// let dc = ingest_csv_from_path("sales.csv", &CsvOptions::default())?;
/// println!("rows={} types={:?}", dc.row_count(), dc.types());
/// # Ok(())
/// # }
/// ```
pub fn ingest_csv_from_path(
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> ExplorerResult<DataContainer> {
    let path = path.as_ref();
    let ctx = IngestionContext::new(path.display().to_string());
    let result = read_rows_from_path(path, options).and_then(DataContainer::new);
    finish(&ctx, options, result)
}

/// Ingest piped CSV (stdin or any other reader) into a [`DataContainer`].
pub fn ingest_csv_from_reader<R: Read>(
    reader: R,
    options: &CsvOptions,
) -> ExplorerResult<DataContainer> {
    let ctx = IngestionContext::new("<reader>");
    let result = read_rows_from_reader(reader, options).and_then(DataContainer::new);
    finish(&ctx, options, result)
}

fn finish(
    ctx: &IngestionContext,
    options: &CsvOptions,
    result: ExplorerResult<DataContainer>,
) -> ExplorerResult<DataContainer> {
    report(options.observer.as_ref(), options.alert_at_or_above, ctx, &result, |dc| {
        IngestionStats {
            rows: dc.row_count(),
            columns: dc.column_count(),
        }
    });
    result
}

fn reader_builder(options: &CsvOptions) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter);
    builder
}

fn read_rows<R: Read>(mut rdr: csv::Reader<R>) -> ExplorerResult<Vec<Row>> {
    let mut records = rdr.records();
    let header: Row = match records.next() {
        Some(record) => record?
            .iter()
            .map(|name| Cell::Text(name.trim().to_owned()))
            .collect(),
        None => return Err(ExplorerError::EmptyInput),
    };

    let mut rows = vec![header];
    for result in records {
        let record = result?;
        rows.push(record.iter().map(parse_cell).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casts_fields() {
        assert_eq!(parse_cell(""), Cell::Null);
        assert_eq!(parse_cell("   "), Cell::Null);
        assert_eq!(parse_cell("42"), Cell::Num(42.0));
        assert_eq!(parse_cell(" -1.5 "), Cell::Num(-1.5));
        assert_eq!(parse_cell("1e3"), Cell::Num(1000.0));
        assert_eq!(parse_cell("NaN"), Cell::from("NaN"));
        assert_eq!(parse_cell("inf"), Cell::from("inf"));
        assert_eq!(parse_cell("2020-01-05"), Cell::from("2020-01-05"));
        assert_eq!(parse_cell("null"), Cell::from("null"));
    }

    #[test]
    fn header_names_stay_text() {
        let rows =
            read_rows_from_reader("2019,2020\n1,2\n".as_bytes(), &CsvOptions::default()).unwrap();
        assert_eq!(rows[0], vec![Cell::from("2019"), Cell::from("2020")]);
        assert_eq!(rows[1], vec![Cell::Num(1.0), Cell::Num(2.0)]);
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = read_rows_from_reader("".as_bytes(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, ExplorerError::EmptyInput));
    }

    #[test]
    fn honours_delimiter() {
        let options = CsvOptions {
            delimiter: b';',
            ..Default::default()
        };
        let rows = read_rows_from_reader("a;b\nx;3\n".as_bytes(), &options).unwrap();
        assert_eq!(rows[1], vec![Cell::from("x"), Cell::Num(3.0)]);
    }
}
