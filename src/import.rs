//! File-to-store entrypoint: intake followed by the batch pipeline.
//!
//! - Structural problems with the file (unreadable, unknown format, missing header columns)
//!   abort the import and are returned as [`ImportError`].
//! - Row-level problems never abort; they end up in the returned [`ImportSummary`].
//!
//! When an observer is configured, a structural failure is reported through `on_failure`,
//! and additionally through `on_alert` when its severity is >= `options.alert_at_or_above`.

use std::path::Path;

use crate::error::{ImportError, ImportResult, RecordError};
use crate::intake::{read_rows_from_path, IntakeOptions};
use crate::observability::{severity_for_error, ImportContext};
use crate::pipeline::batch::run_with_context;
use crate::pipeline::{ImportOptions, ImportSummary};
use crate::schema::Schema;
use crate::store::RecordStore;
use crate::types::NormalizedRecord;

/// Read `path` and import its rows into `store`.
///
/// # Examples
///
/// ## CSV into an in-memory store
///
/// ```no_run
/// use hr_import::import::import_from_path;
/// use hr_import::intake::IntakeOptions;
/// use hr_import::pipeline::ImportOptions;
/// use hr_import::records::Colaborator;
/// use hr_import::schema::{Catalogs, Schema};
/// use hr_import::store::InMemoryStore;
///
/// # fn main() -> Result<(), hr_import::ImportError> {
/// let schema = Schema::colaborators(&Catalogs::default());
/// let mut store: InMemoryStore<Colaborator> = InMemoryStore::new(&schema.unique_keys);
///
/// let summary = import_from_path(
///     "colaborators.csv",
///     &schema,
///     &mut store,
///     &IntakeOptions::default(),
///     &ImportOptions::default(),
/// )?;
/// println!("{summary}");
/// # Ok(())
/// # }
/// ```
///
/// ## Observability (stderr logging + alert threshold)
///
/// ```no_run
/// use std::sync::Arc;
///
/// use hr_import::import::import_from_path;
/// use hr_import::intake::IntakeOptions;
/// use hr_import::observability::{ImportSeverity, StdErrObserver};
/// use hr_import::pipeline::ImportOptions;
/// use hr_import::records::User;
/// use hr_import::schema::Schema;
/// use hr_import::store::InMemoryStore;
///
/// let schema = Schema::users();
/// let mut store: InMemoryStore<User> = InMemoryStore::new(&schema.unique_keys);
/// let opts = ImportOptions {
///     observer: Some(Arc::new(StdErrObserver::default())),
///     alert_at_or_above: ImportSeverity::Critical,
///     ..Default::default()
/// };
///
/// // Missing files are treated as Critical and will trigger `on_alert` at this threshold.
/// let _err = import_from_path("does_not_exist.csv", &schema, &mut store, &IntakeOptions::default(), &opts)
///     .unwrap_err();
/// ```
pub fn import_from_path<S>(
    path: impl AsRef<Path>,
    schema: &Schema,
    store: &mut S,
    intake: &IntakeOptions,
    options: &ImportOptions,
) -> ImportResult<ImportSummary>
where
    S: RecordStore,
    S::Record: for<'r> TryFrom<&'r NormalizedRecord, Error = RecordError>,
{
    let path = path.as_ref();
    let ctx = ImportContext {
        source: Some(path.to_path_buf()),
        record_name: schema.record_name.clone(),
    };

    let rows = match read_rows_from_path(path, schema, intake) {
        Ok(rows) => rows,
        Err(e) => {
            report_failure(options, &ctx, &e);
            return Err(e);
        }
    };
    tracing::info!(source = %path.display(), rows = rows.len(), "input read");

    Ok(run_with_context(schema, rows, store, options, &ctx))
}

fn report_failure(options: &ImportOptions, ctx: &ImportContext, e: &ImportError) {
    if let Some(obs) = options.observer.as_ref() {
        let sev = severity_for_error(e);
        obs.on_failure(ctx, sev, e);
        if sev >= options.alert_at_or_above {
            obs.on_alert(ctx, sev, e);
        }
    }
}
