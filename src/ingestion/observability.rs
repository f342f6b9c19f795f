use std::fmt;
use std::sync::Arc;

use crate::error::ExplorerError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the input could not be read as CSV).
    Error,
    /// Critical error (I/O failures).
    Critical,
}

impl IngestionSeverity {
    /// Classify a loading error.
    pub fn for_error(e: &ExplorerError) -> Self {
        match e {
            ExplorerError::Io(_) => IngestionSeverity::Critical,
            ExplorerError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
                _ => IngestionSeverity::Error,
            },
            ExplorerError::EmptyInput => IngestionSeverity::Warning,
            _ => IngestionSeverity::Error,
        }
    }
}

/// Where the rows of an ingestion attempt came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionContext {
    /// A file path, or `"<stdin>"`/`"<reader>"` for piped input.
    pub source: String,
}

impl IngestionContext {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Minimal stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of data rows (header excluded).
    pub rows: usize,
    /// Number of header columns.
    pub columns: usize,
}

/// Observer interface for ingestion outcomes.
pub trait IngestionObserver: Send + Sync {
    /// Called when ingestion succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when ingestion fails.
    fn on_failure(
        &self,
        _ctx: &IngestionContext,
        _severity: IngestionSeverity,
        _error: &ExplorerError,
    ) {
    }

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &ExplorerError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &ExplorerError,
    ) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &ExplorerError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits ingestion events as `tracing` events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        tracing::info!(
            source = %ctx.source,
            rows = stats.rows,
            columns = stats.columns,
            "ingested csv"
        );
    }

    fn on_failure(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &ExplorerError,
    ) {
        tracing::warn!(source = %ctx.source, ?severity, %error, "csv ingestion failed");
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &ExplorerError) {
        tracing::error!(source = %ctx.source, ?severity, %error, "csv ingestion alert");
    }
}

/// Report `result` to `observer`, alerting when the failure severity reaches `alert_at_or_above`.
pub(crate) fn report<T>(
    observer: Option<&Arc<dyn IngestionObserver>>,
    alert_at_or_above: IngestionSeverity,
    ctx: &IngestionContext,
    result: &Result<T, ExplorerError>,
    stats: impl FnOnce(&T) -> IngestionStats,
) {
    let Some(obs) = observer else {
        return;
    };
    match result {
        Ok(value) => obs.on_success(ctx, stats(value)),
        Err(e) => {
            let sev = IngestionSeverity::for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_critical() {
        let err = ExplorerError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(IngestionSeverity::for_error(&err), IngestionSeverity::Critical);
        assert_eq!(
            IngestionSeverity::for_error(&ExplorerError::EmptyInput),
            IngestionSeverity::Warning
        );
        assert!(IngestionSeverity::Critical > IngestionSeverity::Error);
    }
}
