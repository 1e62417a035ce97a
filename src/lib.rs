//! `hr-import` is a small library for bulk-importing HR records (employees and back-office
//! users) from spreadsheet-like files into a record store.
//!
//! Every row goes through the same pipeline: normalize the raw cells, validate them against
//! the target [`schema::Schema`], skip rows whose natural key already exists, then insert.
//! A bad row never aborts the batch; it is recorded in the returned
//! [`pipeline::ImportSummary`] and the next row is processed.
//!
//! The primary entrypoint is [`import::import_from_path`], which reads the file (format
//! auto-detected from its extension) and runs the pipeline against a store.
//!
//! ## What you can import
//!
//! **File formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv`
//! - **JSON**: `.json` (array-of-objects) and `.ndjson` (newline-delimited objects)
//! - **Excel/workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`
//!
//! The first row is the header. Headers are matched case-insensitively and in any order
//! (`"Document Number"` matches `document_number`); extra columns are ignored.
//!
//! **Targets:**
//!
//! - [`schema::Schema::colaborators`] into [`records::Colaborator`]
//! - [`schema::Schema::users`] into [`records::User`]
//!
//! ## Quick example
//!
//! ```no_run
//! use hr_import::import::import_from_path;
//! use hr_import::intake::IntakeOptions;
//! use hr_import::pipeline::ImportOptions;
//! use hr_import::records::Colaborator;
//! use hr_import::schema::{Catalogs, Schema};
//! use hr_import::store::InMemoryStore;
//!
//! # fn main() -> Result<(), hr_import::ImportError> {
//! let schema = Schema::colaborators(&Catalogs::default());
//! let mut store: InMemoryStore<Colaborator> = InMemoryStore::new(&schema.unique_keys);
//! let summary = import_from_path(
//!     "colaborators.xlsx",
//!     &schema,
//!     &mut store,
//!     &IntakeOptions::default(),
//!     &ImportOptions::default(),
//! )?;
//! println!("{summary}");
//! for entry in &summary.report.entries {
//!     println!("{entry}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`intake`]: reading CSV/JSON/workbook files into raw rows
//! - [`pipeline`]: normalizer, validator, duplicate guard and batch controller
//! - [`schema`]: target field tables and enumeration catalogs
//! - [`records`] / [`store`]: typed records and the storage contract
//! - [`observability`]: observer hooks for import outcomes
//! - [`config`]: TOML configuration
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod import;
pub mod intake;
pub mod observability;
pub mod pipeline;
pub mod records;
pub mod schema;
pub mod store;
pub mod template;
pub mod types;

pub use error::{ImportError, ImportResult};
