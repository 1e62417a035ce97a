//! Unified intake entrypoint.
//!
//! [`read_rows_from_path`] reads a file into [`RawRow`]s for a given [`Schema`]. If
//! [`IntakeOptions::format`] is `None`, the input format is inferred from the file extension.

use std::path::Path;

use crate::error::{ImportError, ImportResult};
use crate::schema::Schema;
use crate::types::RawRow;

use super::{csv, json};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl InputFormat {
    /// Parse an input format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// How to choose sheet(s) when reading a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelection {
    /// Read the first sheet (default).
    #[default]
    First,
    /// Read a single named sheet.
    Sheet(String),
    /// Read all sheets and concatenate rows.
    AllSheets,
    /// Read only the listed sheets (in order) and concatenate rows.
    Sheets(Vec<String>),
}

/// Options controlling how the input file is read.
#[derive(Debug, Clone, Default)]
pub struct IntakeOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<InputFormat>,
    /// Workbook-specific options.
    pub sheet_selection: SheetSelection,
}

/// Read `path` into raw rows.
///
/// Fails fast on structural problems: unreadable file, unknown format, no header row, or a
/// required column missing from the header.
///
/// ```no_run
/// use hr_import::intake::{read_rows_from_path, IntakeOptions};
/// use hr_import::schema::{Catalogs, Schema};
///
/// # fn main() -> Result<(), hr_import::ImportError> {
/// let schema = Schema::colaborators(&Catalogs::default());
/// let rows = read_rows_from_path("colaborators.csv", &schema, &IntakeOptions::default())?;
/// println!("rows={}", rows.len());
/// # Ok(())
/// # }
/// ```
pub fn read_rows_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IntakeOptions,
) -> ImportResult<Vec<RawRow>> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };
    tracing::debug!(path = %path.display(), format = ?fmt, "reading input");

    match fmt {
        InputFormat::Csv => csv::read_csv_from_path(path, schema),
        InputFormat::Json => json::read_json_from_path(path, schema),
        InputFormat::Excel => read_excel_dispatch(path, schema, &options.sheet_selection),
    }
}

/// Infer the input format from a path's extension.
pub fn infer_format_from_path(path: &Path) -> ImportResult<InputFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ImportError::SchemaMismatch {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    InputFormat::from_extension(ext).ok_or_else(|| ImportError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

fn read_excel_dispatch(
    path: &Path,
    schema: &Schema,
    sel: &SheetSelection,
) -> ImportResult<Vec<RawRow>> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, schema, sel);

    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            SheetSelection::First => excel::read_excel_from_path(path, None, schema),
            SheetSelection::Sheet(name) => excel::read_excel_from_path(path, Some(name.as_str()), schema),
            SheetSelection::AllSheets => excel::read_excel_workbook_from_path(path, None, schema),
            SheetSelection::Sheets(names) => {
                let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
                excel::read_excel_workbook_from_path(path, Some(refs.as_slice()), schema)
            }
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(ImportError::SchemaMismatch {
            message: "excel intake not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
