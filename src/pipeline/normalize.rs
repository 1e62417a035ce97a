//! Row normalization.
//!
//! [`normalize`] never fails: anything that cannot be coerced into its canonical form becomes
//! [`FieldValue::Null`], and the validator decides whether that is a problem for the field.

use serde::{Deserialize, Serialize};

use crate::schema::{FieldKind, Schema};
use crate::types::{CellValue, FieldValue, NormalizedRecord, RawRow};

use super::dates;

/// Case folding applied to email fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailCase {
    #[default]
    Lower,
    Upper,
}

/// Normalize every schema field of `row`.
///
/// The output has one entry per schema field; columns of `row` that the schema does not
/// know are dropped.
pub fn normalize(schema: &Schema, row: &RawRow, email_case: EmailCase) -> NormalizedRecord {
    let mut out = NormalizedRecord::new(row.row);
    for field in &schema.fields {
        let value = normalize_cell(&field.kind, row.get(&field.name), email_case);
        out.set(field.name.clone(), value);
    }
    out
}

/// Normalize a single cell according to its field kind.
pub fn normalize_cell(kind: &FieldKind, cell: &CellValue, email_case: EmailCase) -> FieldValue {
    if cell.is_blank() {
        return FieldValue::Null;
    }

    match kind {
        FieldKind::Date => match dates::numeric_serial(cell) {
            Some(serial) => dates::from_serial(serial)
                .map(FieldValue::Date)
                .unwrap_or(FieldValue::Null),
            // Left untouched; the validator's date rule parses it.
            None => FieldValue::Text(cell.to_text()),
        },
        FieldKind::Enum(allowed) => {
            let value = cell.to_text().trim().to_uppercase();
            if allowed.iter().any(|a| *a == value) {
                FieldValue::Text(value)
            } else {
                FieldValue::Null
            }
        }
        FieldKind::Digits { max } => {
            let digits: String = cell.to_text().chars().filter(|c| c.is_ascii_digit()).collect();
            text_or_null(truncate_chars(&digits, *max))
        }
        FieldKind::UpperText { max } => {
            text_or_null(truncate_chars(&cell.to_text().trim().to_uppercase(), *max))
        }
        FieldKind::Email { max } => {
            let trimmed = cell.to_text().trim().to_string();
            let folded = match email_case {
                EmailCase::Lower => trimmed.to_lowercase(),
                EmailCase::Upper => trimmed.to_uppercase(),
            };
            text_or_null(truncate_chars(&folded, *max))
        }
        FieldKind::Status => match cell.to_text().trim().to_lowercase().as_str() {
            "activo" | "1" => FieldValue::Bool(true),
            "inactivo" | "0" => FieldValue::Bool(false),
            _ => FieldValue::Null,
        },
        FieldKind::FreeText => text_or_null(cell.to_text().trim().to_string()),
    }
}

fn text_or_null(s: String) -> FieldValue {
    if s.is_empty() {
        FieldValue::Null
    } else {
        FieldValue::Text(s)
    }
}

/// Truncate to at most `max` characters (not bytes).
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::schema::{Catalogs, Schema};

    fn colaborators() -> Schema {
        Schema::colaborators(&Catalogs::default())
    }

    fn field_of(schema: &Schema, row: RawRow, field: &str) -> FieldValue {
        normalize(schema, &row, EmailCase::Lower).get(field).clone()
    }

    #[test]
    fn document_type_is_trimmed_and_upper_cased() {
        let s = colaborators();
        assert_eq!(
            field_of(&s, RawRow::new(2).with("document_type", " cc "), "document_type"),
            FieldValue::Text("CC".to_string())
        );
    }

    #[test]
    fn out_of_set_enum_becomes_null() {
        let s = colaborators();
        assert_eq!(
            field_of(&s, RawRow::new(2).with("document_type", "XX"), "document_type"),
            FieldValue::Null
        );
        assert_eq!(
            field_of(&s, RawRow::new(2).with("job_position", "jefe de proyecto"), "job_position"),
            FieldValue::Text("JEFE DE PROYECTO".to_string())
        );
    }

    #[test]
    fn long_document_number_is_truncated() {
        let s = colaborators();
        let raw = "1234567890123456789012345";
        assert_eq!(
            field_of(&s, RawRow::new(2).with("document_number", raw), "document_number"),
            FieldValue::Text("12345678901234567890".to_string())
        );
    }

    #[test]
    fn phone_numbers_keep_digits_only() {
        let s = colaborators();
        assert_eq!(
            field_of(&s, RawRow::new(2).with("mobile", "+57 (300) 123-4567"), "mobile"),
            FieldValue::Text("573001234567".to_string())
        );
        assert_eq!(
            field_of(&s, RawRow::new(2).with("mobile", 3001234567_i64), "mobile"),
            FieldValue::Text("3001234567".to_string())
        );
        assert_eq!(
            field_of(&s, RawRow::new(2).with("phone", "n/a"), "phone"),
            FieldValue::Null
        );
    }

    #[test]
    fn names_are_upper_cased_and_truncated_by_character() {
        let s = colaborators();
        assert_eq!(
            field_of(&s, RawRow::new(2).with("last_name", "  muñoz  "), "last_name"),
            FieldValue::Text("MUÑOZ".to_string())
        );
        let long = "ñ".repeat(120);
        match field_of(&s, RawRow::new(2).with("first_name", long), "first_name") {
            FieldValue::Text(v) => assert_eq!(v.chars().count(), 100),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn emails_follow_configured_case() {
        let s = colaborators();
        let row = RawRow::new(2).with("personal_email", "  Ana@Example.COM ");
        assert_eq!(
            normalize(&s, &row, EmailCase::Lower).get("personal_email"),
            &FieldValue::Text("ana@example.com".to_string())
        );
        assert_eq!(
            normalize(&s, &row, EmailCase::Upper).get("personal_email"),
            &FieldValue::Text("ANA@EXAMPLE.COM".to_string())
        );
    }

    #[test]
    fn status_accepts_words_and_digits() {
        let s = colaborators();
        let status = |v: CellValue| field_of(&s, RawRow::new(2).with("status", v), "status");
        assert_eq!(status(CellValue::from("Activo")), FieldValue::Bool(true));
        assert_eq!(status(CellValue::from("INACTIVO")), FieldValue::Bool(false));
        assert_eq!(status(CellValue::Number(1.0)), FieldValue::Bool(true));
        assert_eq!(status(CellValue::from("0")), FieldValue::Bool(false));
        assert_eq!(status(CellValue::from("maybe")), FieldValue::Null);
    }

    #[test]
    fn date_serials_convert_and_text_passes_through() {
        let s = colaborators();
        assert_eq!(
            field_of(&s, RawRow::new(2).with("birth_date", 1.0), "birth_date"),
            FieldValue::Date(NaiveDate::from_ymd_opt(1899, 12, 31).unwrap())
        );
        assert_eq!(
            field_of(&s, RawRow::new(2).with("hire_date", 60_i64), "hire_date"),
            FieldValue::Date(NaiveDate::from_ymd_opt(1900, 2, 28).unwrap())
        );
        assert_eq!(
            field_of(&s, RawRow::new(2).with("hire_date", "17/05/2021"), "hire_date"),
            FieldValue::Text("17/05/2021".to_string())
        );
    }

    #[test]
    fn nullable_fields_default_to_null() {
        let s = colaborators();
        let rec = normalize(&s, &RawRow::new(2), EmailCase::Lower);
        assert_eq!(rec.get("corporate_email"), &FieldValue::Null);
        assert_eq!(rec.get("phone"), &FieldValue::Null);
        assert_eq!(rec.get("notes"), &FieldValue::Null);
        assert_eq!(rec.values.len(), s.fields.len());
    }

    #[test]
    fn notes_keep_their_case() {
        let s = colaborators();
        assert_eq!(
            field_of(&s, RawRow::new(2).with("notes", "  Prefers remote work "), "notes"),
            FieldValue::Text("Prefers remote work".to_string())
        );
    }
}
