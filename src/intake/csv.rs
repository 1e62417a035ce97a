//! CSV intake.

use std::path::Path;

use crate::error::ImportResult;
use crate::schema::Schema;
use crate::types::{CellValue, RawRow};

use super::headers::project_headers;

/// Read a CSV file into raw rows.
///
/// Rules:
///
/// - The first line is the header row; headers match schema fields case-insensitively and
///   may appear in any order.
/// - Every required schema field must have a header.
/// - Cells are kept as text; rows whose cells are all blank are skipped.
/// - Cells that are not valid UTF-8 are decoded as Latin-1, so legacy spreadsheet exports
///   import instead of failing the whole file.
pub fn read_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> ImportResult<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    read_csv_from_reader(&mut rdr, schema)
}

/// Read CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> ImportResult<Vec<RawRow>> {
    let headers: Vec<String> = rdr.byte_headers()?.iter().map(decode_cell).collect();
    let projection = project_headers(headers.iter().map(String::as_str), schema)?;

    let mut rows = Vec::new();
    for (row_idx0, result) in rdr.byte_records().enumerate() {
        // 1-based, and the header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row = RawRow::new(user_row);
        for (idx, field) in &projection {
            let raw = record.get(*idx).unwrap_or_default();
            if !raw.is_empty() {
                row.insert(field.clone(), CellValue::Text(decode_cell(raw)));
            }
        }
        if row.cells.values().all(CellValue::is_blank) {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

fn decode_cell(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1 maps each byte to the code point of the same value.
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
