//! hr-import CLI - bulk employee/user import tool

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

use hr_import::config::ImportConfig;
use hr_import::error::RecordError;
use hr_import::import::import_from_path;
use hr_import::intake::{IntakeOptions, SheetSelection};
use hr_import::observability::TracingObserver;
use hr_import::pipeline::{DuplicatePolicy, ImportOptions, ImportSummary};
use hr_import::records::{Colaborator, Keyed, User};
use hr_import::schema::{ImportTarget, Schema};
use hr_import::store::{InMemoryStore, RecordStore};
use hr_import::template::write_template;
use hr_import::types::NormalizedRecord;

#[derive(Parser)]
#[command(name = "hr-import")]
#[command(author, version, about = "Bulk import of employee and user spreadsheets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a CSV, JSON or workbook file
    Import {
        /// What the file contains
        target: Target,

        /// Input file (csv, json, ndjson, xlsx, xls, ods)
        input: PathBuf,

        /// JSON file holding existing records; loaded before and saved after the import
        #[arg(long)]
        store: Option<PathBuf>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// List duplicate rows in the report instead of skipping them silently
        #[arg(long)]
        report_duplicates: bool,

        /// Workbook sheet to read (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Write a blank CSV template with the expected headers
    Template {
        target: Target,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Colaborators,
    Users,
}

impl From<Target> for ImportTarget {
    fn from(t: Target) -> Self {
        match t {
            Target::Colaborators => ImportTarget::Colaborators,
            Target::Users => ImportTarget::Users,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            target,
            input,
            store,
            config,
            report_duplicates,
            sheet,
        } => {
            let config = match config {
                Some(path) => ImportConfig::from_path(&path)
                    .with_context(|| format!("Failed to load config '{}'", path.display()))?,
                None => ImportConfig::default(),
            };
            let mut options = ImportOptions {
                observer: Some(Arc::new(TracingObserver)),
                ..config.to_options()
            };
            if report_duplicates {
                options.duplicate_policy = DuplicatePolicy::Report;
            }
            let intake = IntakeOptions {
                sheet_selection: sheet.map_or(SheetSelection::First, SheetSelection::Sheet),
                ..Default::default()
            };

            let target = ImportTarget::from(target);
            let schema = target.schema(&config.catalogs);
            let summary = match target {
                ImportTarget::Colaborators => {
                    import_into::<Colaborator>(&schema, &input, store.as_deref(), &intake, &options)?
                }
                ImportTarget::Users => {
                    import_into::<User>(&schema, &input, store.as_deref(), &intake, &options)?
                }
            };
            print_summary(&summary);
            Ok(())
        }
        Commands::Template { target, output } => {
            let schema = ImportTarget::from(target).schema(&ImportConfig::default().catalogs);
            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create '{}'", path.display()))?;
                    write_template(&schema, file)?;
                }
                None => write_template(&schema, io::stdout().lock())?,
            }
            Ok(())
        }
    }
}

fn import_into<R>(
    schema: &Schema,
    input: &Path,
    store_path: Option<&Path>,
    intake: &IntakeOptions,
    options: &ImportOptions,
) -> Result<ImportSummary>
where
    R: Keyed + Serialize + DeserializeOwned,
    R: for<'r> TryFrom<&'r NormalizedRecord, Error = RecordError>,
{
    let mut store: InMemoryStore<R> = match store_path {
        Some(path) => InMemoryStore::load_json(path, &schema.unique_keys)
            .with_context(|| format!("Failed to load store '{}'", path.display()))?,
        None => InMemoryStore::new(&schema.unique_keys),
    };
    let before = store.len();

    let summary = import_from_path(input, schema, &mut store, intake, options)
        .with_context(|| format!("Failed to import '{}'", input.display()))?;

    if let Some(path) = store_path {
        store
            .save_json(path)
            .with_context(|| format!("Failed to save store '{}'", path.display()))?;
        tracing::info!(before, after = store.len(), store = %path.display(), "store saved");
    }
    Ok(summary)
}

fn print_summary(summary: &ImportSummary) {
    println!("{summary}");
    for entry in &summary.report.entries {
        println!("  {entry}");
    }
}
