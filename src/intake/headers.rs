//! Header-row matching.

use crate::error::{ImportError, ImportResult};
use crate::schema::Schema;

/// Canonical form of a header cell: trimmed, lower-cased, with runs of spaces, hyphens and
/// dots collapsed to a single underscore (`"Document Number"` → `document_number`).
pub fn slug(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    let mut pending_sep = false;
    for c in header.trim().chars() {
        if c.is_whitespace() || c == '-' || c == '_' || c == '.' {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push('_');
                pending_sep = false;
            }
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Maps input columns onto schema fields.
///
/// Returns `(column index, field name)` pairs for every header that names a schema field.
/// Unknown headers are ignored; a required field without a header is a structural error.
pub(crate) fn project_headers<'h>(
    headers: impl IntoIterator<Item = &'h str>,
    schema: &Schema,
) -> ImportResult<Vec<(usize, String)>> {
    let slugs: Vec<String> = headers.into_iter().map(slug).collect();

    let mut projection = Vec::new();
    for field in schema.field_names() {
        if let Some(idx) = slugs.iter().position(|h| h == field) {
            projection.push((idx, field.to_string()));
        }
    }

    let missing: Vec<&str> = schema
        .required_columns()
        .filter(|name| !projection.iter().any(|(_, f)| f == name))
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::SchemaMismatch {
            message: format!(
                "missing required column(s) {}. headers={:?}",
                missing
                    .iter()
                    .map(|m| format!("'{m}'"))
                    .collect::<Vec<_>>()
                    .join(", "),
                slugs
            ),
        });
    }

    Ok(projection)
}
