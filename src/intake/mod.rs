//! Row intake: reading an input file into [`crate::types::RawRow`]s.
//!
//! Most callers should use [`read_rows_from_path`] (from [`unified`]), or
//! [`crate::import::import_from_path`] which also runs the pipeline.
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod headers;
pub mod json;
pub mod unified;

pub use unified::{infer_format_from_path, read_rows_from_path, InputFormat, IntakeOptions, SheetSelection};
