//! JSON intake.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"name":"Ana"}, {"name":"Luis"}]`
//! - Newline-delimited JSON (NDJSON): `{"name":"Ana"}\n{"name":"Luis"}\n`
//!
//! Object keys play the role of headers and are matched the same way. A key missing from
//! one object is a missing cell for that row, not a structural error. Objects with no
//! non-blank known field are skipped like blank spreadsheet rows.

use std::fs;
use std::path::Path;

use crate::error::{ImportError, ImportResult};
use crate::schema::Schema;
use crate::types::{CellValue, RawRow};

use super::headers::slug;

/// Read a JSON file into raw rows.
pub fn read_json_from_path(path: impl AsRef<Path>, schema: &Schema) -> ImportResult<Vec<RawRow>> {
    let text = fs::read_to_string(path)?;
    read_json_from_str(&text, schema)
}

/// Read JSON from an in-memory string into raw rows.
pub fn read_json_from_str(input: &str, schema: &Schema) -> ImportResult<Vec<RawRow>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ImportError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => json_values_to_rows(&items, schema),
            serde_json::Value::Object(_) => json_values_to_rows(&[v], schema),
            _ => Err(ImportError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                ImportError::SchemaMismatch {
                    message: format!("invalid ndjson at line {}: {}", i + 1, e),
                }
            })?;
            values.push(v);
        }
        json_values_to_rows(&values, schema)
    }
}

fn json_values_to_rows(values: &[serde_json::Value], schema: &Schema) -> ImportResult<Vec<RawRow>> {
    let mut rows = Vec::with_capacity(values.len());

    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = v.as_object().ok_or_else(|| ImportError::SchemaMismatch {
            message: format!("row {row_num} is not a json object"),
        })?;

        let mut row = RawRow::new(row_num);
        for (key, value) in obj {
            let name = slug(key);
            if schema.field(&name).is_some() {
                row.insert(name, convert_json_value(value));
            }
        }
        if row.cells.values().all(CellValue::is_blank) {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

fn convert_json_value(v: &serde_json::Value) -> CellValue {
    match v {
        serde_json::Value::Null => CellValue::Empty,
        serde_json::Value::Bool(b) => CellValue::Bool(*b),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) => CellValue::Number(f),
            None => CellValue::Text(n.to_string()),
        },
        serde_json::Value::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}
