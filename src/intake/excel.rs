#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, ExcelDateTime, ExcelDateTimeType, Reader};

use crate::error::{ImportError, ImportResult};
use crate::schema::Schema;
use crate::types::{CellValue, RawRow};

use super::headers::project_headers;

/// Days between the 1900 and 1904 date-system epochs.
const EPOCH_1904_OFFSET: f64 = 1462.0;

/// Read one sheet of a workbook (`.xlsx`, `.xls`, `.ods`, etc.) into raw rows.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Checks that every required schema field has a header
/// - Keeps numeric cells numeric, so date cells arrive as spreadsheet serials
pub fn read_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
    schema: &Schema,
) -> ImportResult<Vec<RawRow>> {
    let sheets: Option<Vec<&str>> = sheet_name.map(|s| vec![s]);
    read_excel_workbook_from_path(path, sheets.as_deref(), schema)
}

/// Read multiple sheets from a workbook and concatenate their rows.
///
/// - If `sheet_names` is `None`, reads **all sheets** in workbook order.
/// - If `sheet_names` is `Some(&[...])`, reads only those sheets (in the provided order).
///
/// Every sheet must carry its own header row. Row numbers restart on each sheet.
pub fn read_excel_workbook_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
    schema: &Schema,
) -> ImportResult<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheets: Vec<String> = match sheet_names {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => workbook.sheet_names().to_vec(),
    };
    if sheets.is_empty() {
        return Err(ImportError::SchemaMismatch {
            message: "workbook has no sheets".to_string(),
        });
    }

    let mut all_rows = Vec::new();
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        let mut sheet_rows = read_sheet_range(&range, schema)
            .map_err(|e| wrap_schema_err_with_sheet(&sheet, e))?;
        tracing::debug!(sheet = %sheet, rows = sheet_rows.len(), "sheet read");
        all_rows.append(&mut sheet_rows);
    }

    Ok(all_rows)
}

/// Read the first sheet of an in-memory workbook.
///
/// Useful when the file arrives as an upload rather than a path.
pub fn read_excel_from_bytes(bytes: Vec<u8>, schema: &Schema) -> ImportResult<Vec<RawRow>> {
    let cursor = std::io::Cursor::new(bytes);
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::SchemaMismatch {
            message: "workbook has no sheets".to_string(),
        })?;
    let range = workbook.worksheet_range(&first)?;
    read_sheet_range(&range, schema).map_err(|e| wrap_schema_err_with_sheet(&first, e))
}

fn read_sheet_range(range: &calamine::Range<Data>, schema: &Schema) -> ImportResult<Vec<RawRow>> {
    // The range may not start at A1 when the top rows are empty.
    let first_row = range.start().map_or(0, |(r, _)| r as usize);

    let (header_idx0, header_cells) = range
        .rows()
        .enumerate()
        .find(|(_, row)| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|(idx0, row)| (idx0, row.iter().map(cell_to_header_string).collect::<Vec<_>>()))
        .ok_or_else(|| ImportError::SchemaMismatch {
            message: "sheet has no non-empty rows (no header row found)".to_string(),
        })?;

    let projection = project_headers(header_cells.iter().map(String::as_str), schema)?;

    let mut rows = Vec::new();
    for (idx0, cells) in range.rows().enumerate().skip(header_idx0 + 1) {
        // Report 1-based row number (Excel-like).
        let mut row = RawRow::new(first_row + idx0 + 1);
        for (col_idx, field) in &projection {
            let cell = convert_cell(cells.get(*col_idx).unwrap_or(&Data::Empty));
            if !matches!(cell, CellValue::Empty) {
                row.insert(field.clone(), cell);
            }
        }
        if row.cells.values().all(CellValue::is_blank) {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

fn wrap_schema_err_with_sheet(sheet: &str, err: ImportError) -> ImportError {
    match err {
        ImportError::SchemaMismatch { message } => ImportError::SchemaMismatch {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    }
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> CellValue {
    match c {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(serial_1900(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        // Formula errors (#N/A, #REF!, ...) carry no usable value.
        Data::Error(_) => CellValue::Empty,
    }
}

/// Serial of `dt` in the 1900 date system, whatever system the workbook uses.
fn serial_1900(dt: &ExcelDateTime) -> f64 {
    // calamine keeps the 1904 flag private; rebuilding the value with the flag set exposes it.
    let kind = if dt.is_duration() {
        ExcelDateTimeType::TimeDelta
    } else {
        ExcelDateTimeType::DateTime
    };
    let is_1904 = *dt == ExcelDateTime::new(dt.as_f64(), kind, true);
    if is_1904 && dt.is_datetime() {
        dt.as_f64() + EPOCH_1904_OFFSET
    } else {
        dt.as_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_cells_keeping_numbers_numeric() {
        assert_eq!(convert_cell(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(convert_cell(&Data::Float(45292.0)), CellValue::Number(45292.0));
        assert_eq!(
            convert_cell(&Data::String("CC".to_string())),
            CellValue::Text("CC".to_string())
        );
        assert_eq!(convert_cell(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn date_cells_from_1904_workbooks_are_rebased() {
        use crate::pipeline::normalize::{normalize_cell, EmailCase};
        use crate::schema::FieldKind;
        use crate::types::FieldValue;

        let mac = Data::DateTime(ExcelDateTime::new(43830.0, ExcelDateTimeType::DateTime, true));
        let cell = convert_cell(&mac);
        assert_eq!(cell, CellValue::Number(45292.0));
        assert_eq!(
            normalize_cell(&FieldKind::Date, &cell, EmailCase::Lower),
            FieldValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );

        let windows = Data::DateTime(ExcelDateTime::new(45292.0, ExcelDateTimeType::DateTime, false));
        assert_eq!(convert_cell(&windows), CellValue::Number(45292.0));
    }

    #[test]
    fn finds_header_below_empty_rows() {
        let mut range: calamine::Range<Data> = calamine::Range::new((0, 0), (3, 3));
        range.set_value((1, 0), Data::String("Name".to_string()));
        range.set_value((1, 1), Data::String("Email".to_string()));
        range.set_value((1, 2), Data::String("Status".to_string()));
        range.set_value((2, 0), Data::String("Ana".to_string()));
        range.set_value((2, 1), Data::String("ana@example.com".to_string()));
        range.set_value((2, 2), Data::Int(1));

        let rows = read_sheet_range(&range, &Schema::users()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row, 3);
        assert_eq!(rows[0].get("status"), &CellValue::Number(1.0));
    }
}
