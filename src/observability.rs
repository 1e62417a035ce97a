//! Observer hooks for import outcomes.
//!
//! Observers receive batch completions, per-row rejections, and structural failures. The
//! built-in observers log to stderr or append to a local file; [`TracingObserver`] forwards
//! everything as `tracing` events.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::ImportError;
use crate::pipeline::{FieldViolation, ImportSummary};

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about an import attempt.
#[derive(Debug, Clone)]
pub struct ImportContext {
    /// Input file, if the rows came from one.
    pub source: Option<PathBuf>,
    /// Singular record name of the target schema.
    pub record_name: String,
}

impl ImportContext {
    fn source_label(&self) -> String {
        self.source
            .as_ref()
            .map_or_else(|| "<memory>".to_string(), |p| p.display().to_string())
    }
}

/// Observer interface for import outcomes.
pub trait ImportObserver: Send + Sync {
    /// Called once a batch has been processed, whatever the per-row outcome.
    fn on_batch_finished(&self, _ctx: &ImportContext, _summary: &ImportSummary) {}

    /// Called for every row that fails validation or persistence.
    fn on_row_rejected(&self, _ctx: &ImportContext, _row: usize, _violations: &[FieldViolation]) {}

    /// Called when an import cannot start (unreadable input, missing header, ...).
    fn on_failure(&self, _ctx: &ImportContext, _severity: ImportSeverity, _error: &ImportError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Severity of a structural import failure.
pub fn severity_for_error(e: &ImportError) -> ImportSeverity {
    match e {
        ImportError::Io(_) => ImportSeverity::Critical,
        ImportError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => ImportSeverity::Critical,
            _ => ImportSeverity::Error,
        },
        #[cfg(feature = "excel")]
        ImportError::Excel(_) => ImportSeverity::Error,
        ImportError::Json(_) => ImportSeverity::Error,
        ImportError::Config(_) => ImportSeverity::Error,
        ImportError::SchemaMismatch { .. } => ImportSeverity::Error,
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ImportObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ImportObserver>>) -> Self {
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

impl ImportObserver for CompositeObserver {
    fn on_batch_finished(&self, ctx: &ImportContext, summary: &ImportSummary) {
        for o in &self.observers {
            o.on_batch_finished(ctx, summary);
        }
    }

    fn on_row_rejected(&self, ctx: &ImportContext, row: usize, violations: &[FieldViolation]) {
        for o in &self.observers {
            o.on_row_rejected(ctx, row, violations);
        }
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs import events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ImportObserver for StdErrObserver {
    fn on_batch_finished(&self, ctx: &ImportContext, summary: &ImportSummary) {
        eprintln!(
            "[import][done] target={} source={} {}",
            ctx.record_name,
            ctx.source_label(),
            summary
        );
    }

    fn on_row_rejected(&self, ctx: &ImportContext, row: usize, violations: &[FieldViolation]) {
        eprintln!(
            "[import][row {row}] target={} {}",
            ctx.record_name,
            join_violations(violations)
        );
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!(
            "[import][{:?}] target={} source={} err={}",
            severity,
            ctx.record_name,
            ctx.source_label(),
            error
        );
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!(
            "[ALERT][import][{:?}] target={} source={} err={}",
            severity,
            ctx.record_name,
            ctx.source_label(),
            error
        );
    }
}

/// Forwards import events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ImportObserver for TracingObserver {
    fn on_batch_finished(&self, ctx: &ImportContext, summary: &ImportSummary) {
        tracing::info!(
            target: "hr_import",
            record = %ctx.record_name,
            source = %ctx.source_label(),
            imported = summary.imported,
            failed = summary.failed(),
            skipped_duplicates = summary.skipped_duplicates,
            "import finished"
        );
    }

    fn on_row_rejected(&self, ctx: &ImportContext, row: usize, violations: &[FieldViolation]) {
        tracing::warn!(
            target: "hr_import",
            record = %ctx.record_name,
            row,
            violations = %join_violations(violations),
            "row rejected"
        );
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        tracing::error!(
            target: "hr_import",
            record = %ctx.record_name,
            source = %ctx.source_label(),
            ?severity,
            %error,
            "import failed"
        );
    }
}

/// Appends import events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ImportObserver for FileObserver {
    fn on_batch_finished(&self, ctx: &ImportContext, summary: &ImportSummary) {
        self.append_line(&format!(
            "{} done target={} source={} imported={} failed={} skipped={}",
            unix_ts(),
            ctx.record_name,
            ctx.source_label(),
            summary.imported,
            summary.failed(),
            summary.skipped_duplicates
        ));
    }

    fn on_row_rejected(&self, ctx: &ImportContext, row: usize, violations: &[FieldViolation]) {
        self.append_line(&format!(
            "{} rejected target={} row={} {}",
            unix_ts(),
            ctx.record_name,
            row,
            join_violations(violations)
        ));
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.append_line(&format!(
            "{} fail severity={:?} target={} source={} err={}",
            unix_ts(),
            severity,
            ctx.record_name,
            ctx.source_label(),
            error
        ));
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} target={} source={} err={}",
            unix_ts(),
            severity,
            ctx.record_name,
            ctx.source_label(),
            error
        ));
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.violation))
        .collect::<Vec<_>>()
        .join("; ")
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
