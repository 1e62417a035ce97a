//! The import pipeline.
//!
//! Each row goes through four stages, in order:
//!
//! - [`normalize()`]: coerce raw cells into canonical values (never fails)
//! - [`validate()`]: evaluate the schema's rule table and collect every violation
//! - [`is_duplicate()`]: probe the store for existing natural keys
//! - [`run()`]: drive the stages for a whole batch and insert accepted records
//!
//! ## Example: a three-row batch with one bad row
//!
//! ```rust
//! use hr_import::pipeline::{run, ImportOptions};
//! use hr_import::records::User;
//! use hr_import::schema::Schema;
//! use hr_import::store::{InMemoryStore, RecordStore};
//! use hr_import::types::RawRow;
//!
//! let schema = Schema::users();
//! let mut store: InMemoryStore<User> = InMemoryStore::new(&schema.unique_keys);
//!
//! let rows = vec![
//!     RawRow::new(2).with("name", "Ana").with("email", "ana@example.com").with("status", "1"),
//!     RawRow::new(3).with("name", "Luis").with("status", "1"),
//!     RawRow::new(4).with("name", "Eva").with("email", "eva@example.com").with("status", "0"),
//! ];
//!
//! let summary = run(&schema, rows, &mut store, &ImportOptions::default());
//! assert_eq!(summary.to_string(), "2 rows imported, 1 row failed");
//! assert_eq!(summary.violations_for(3)[0].field, "email");
//! assert_eq!(store.len(), 2);
//! ```

pub mod batch;
pub mod dates;
pub mod duplicates;
pub mod normalize;
pub mod report;
pub mod validate;

pub use batch::{run, DuplicatePolicy, ImportOptions};
pub use duplicates::{find_duplicate, is_duplicate};
pub use normalize::{normalize, EmailCase};
pub use report::{FieldViolation, ImportSummary, ReportEntry, ValidationReport, Violation};
pub use validate::validate;
