//! Batch controller: drives each row through normalize → validate → duplicate guard → store.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::error::{RecordError, StoreError};
use crate::observability::{ImportContext, ImportObserver, ImportSeverity};
use crate::schema::Schema;
use crate::store::RecordStore;
use crate::types::{NormalizedRecord, RawRow};

use super::duplicates::find_duplicate;
use super::normalize::{normalize, EmailCase};
use super::report::{FieldViolation, ImportSummary, Violation};
use super::validate::validate;

/// What to do with a row whose natural key already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Leave the row out silently; re-running an import is idempotent.
    #[default]
    Skip,
    /// Leave the row out and add a [`Violation::Duplicate`] entry to the report.
    Report,
}

/// Options controlling an import run.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ImportOptions {
    /// Case folding for email fields.
    pub email_case: EmailCase,
    /// Handling of rows that collide with existing records.
    pub duplicate_policy: DuplicatePolicy,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ImportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ImportSeverity,
}

impl fmt::Debug for ImportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportOptions")
            .field("email_case", &self.email_case)
            .field("duplicate_policy", &self.duplicate_policy)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            email_case: EmailCase::default(),
            duplicate_policy: DuplicatePolicy::default(),
            observer: None,
            alert_at_or_above: ImportSeverity::Critical,
        }
    }
}

/// Import `rows` into `store`, in order.
///
/// A row that fails validation, or whose record the store rejects, is recorded in the
/// summary's report and the loop moves on; nothing a single row does aborts the batch.
/// Rows colliding with an existing natural key are counted as skipped (and reported only
/// under [`DuplicatePolicy::Report`]).
///
/// ```
/// use hr_import::pipeline::{run, ImportOptions};
/// use hr_import::records::User;
/// use hr_import::schema::Schema;
/// use hr_import::store::{InMemoryStore, RecordStore};
/// use hr_import::types::RawRow;
///
/// let schema = Schema::users();
/// let mut store: InMemoryStore<User> = InMemoryStore::new(&schema.unique_keys);
/// let rows = vec![
///     RawRow::new(2).with("name", "Ana").with("email", "ana@example.com").with("status", "1"),
///     RawRow::new(3).with("name", "Luis").with("email", "bad").with("status", "1"),
/// ];
///
/// let summary = run(&schema, rows, &mut store, &ImportOptions::default());
/// assert_eq!(summary.imported, 1);
/// assert_eq!(summary.failed(), 1);
/// assert_eq!(store.len(), 1);
/// ```
pub fn run<S, I>(schema: &Schema, rows: I, store: &mut S, options: &ImportOptions) -> ImportSummary
where
    I: IntoIterator<Item = RawRow>,
    S: RecordStore,
    S::Record: for<'r> TryFrom<&'r NormalizedRecord, Error = RecordError>,
{
    let ctx = ImportContext {
        source: None,
        record_name: schema.record_name.clone(),
    };
    run_with_context(schema, rows, store, options, &ctx)
}

pub(crate) fn run_with_context<S, I>(
    schema: &Schema,
    rows: I,
    store: &mut S,
    options: &ImportOptions,
    ctx: &ImportContext,
) -> ImportSummary
where
    I: IntoIterator<Item = RawRow>,
    S: RecordStore,
    S::Record: for<'r> TryFrom<&'r NormalizedRecord, Error = RecordError>,
{
    let _span = debug_span!("import_batch", record = %schema.record_name).entered();
    let mut summary = ImportSummary::default();

    for raw in rows {
        let row = raw.row;
        let record = normalize(schema, &raw, options.email_case);

        let violations = validate(schema, &record);
        if !violations.is_empty() {
            debug!(row, count = violations.len(), "row failed validation");
            reject(&mut summary, options, ctx, row, violations);
            continue;
        }

        if let Some(field) = find_duplicate(&record, &schema.unique_keys, |f, v| store.exists(f, v)) {
            debug!(row, field, "row skipped as duplicate");
            summary.skipped_duplicates += 1;
            if options.duplicate_policy == DuplicatePolicy::Report {
                summary.report.record_row(
                    row,
                    vec![FieldViolation {
                        field: field.to_string(),
                        violation: Violation::Duplicate,
                    }],
                );
            }
            continue;
        }

        match persist(store, &record) {
            Ok(()) => {
                debug!(row, "row imported");
                summary.imported += 1;
            }
            Err(violation) => {
                debug!(row, field = %violation.field, "row rejected by store");
                reject(&mut summary, options, ctx, row, vec![violation]);
            }
        }
    }

    if let Some(obs) = options.observer.as_ref() {
        obs.on_batch_finished(ctx, &summary);
    }
    summary
}

fn persist<S>(store: &mut S, record: &NormalizedRecord) -> Result<(), FieldViolation>
where
    S: RecordStore,
    S::Record: for<'r> TryFrom<&'r NormalizedRecord, Error = RecordError>,
{
    let typed = <S::Record as TryFrom<&NormalizedRecord>>::try_from(record).map_err(|e| {
        let field = match &e {
            RecordError::Missing { field } | RecordError::Invalid { field, .. } => field.clone(),
        };
        persistence_violation(field, e.to_string())
    })?;

    store.insert(typed).map_err(|e| {
        let field = match &e {
            StoreError::UniqueViolation { field, .. } => field.clone(),
            _ => "*".to_string(),
        };
        persistence_violation(field, e.to_string())
    })
}

fn persistence_violation(field: String, message: String) -> FieldViolation {
    FieldViolation {
        field,
        violation: Violation::Persistence { message },
    }
}

fn reject(
    summary: &mut ImportSummary,
    options: &ImportOptions,
    ctx: &ImportContext,
    row: usize,
    violations: Vec<FieldViolation>,
) {
    if let Some(obs) = options.observer.as_ref() {
        obs.on_row_rejected(ctx, row, &violations);
    }
    summary.report.record_row(row, violations);
}
