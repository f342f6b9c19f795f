use thiserror::Error;

/// Convenience result type used across the crate.
pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Error type returned by loading, configuration, and set-up functions.
///
/// Profiling and aggregation never fail: messy data degrades to `None` values or skipped
/// rows instead. Everything here is either an I/O problem or a user-input problem that is
/// caught before the core runs.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Underlying I/O error (e.g. file not found, broken pipe).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization error for configuration or response payloads.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input did not contain a header row.
    #[error("no data: input has no header row")]
    EmptyInput,

    /// A column reference (name or index) does not resolve against the header.
    #[error("unknown column '{column}'. header={available:?}")]
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },

    /// A Y-axis (or aggregate) was requested without an X-axis.
    #[error("invalid chart config: y-axis requires an x-axis")]
    MissingXAxis,

    /// The Y column is not numeric and the aggregate needs numbers.
    #[error("invalid chart config: y column '{column}' is not numeric")]
    NonNumericY { column: String },

    /// An option value (aggregate name, date granularity) is not recognised.
    #[error("invalid value '{value}' for {option}")]
    InvalidOption { option: &'static str, value: String },

    /// A global tracing subscriber is already installed.
    #[error("logging init failed: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}
