//! Rule-table validation of normalized records.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::{Rule, Schema};
use crate::types::{FieldValue, NormalizedRecord};

use super::dates;
use super::report::{FieldViolation, Violation};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    )
    .expect("email regex is valid")
});

/// Evaluate every rule of every schema field against `record`.
///
/// All violations are returned, in schema field order then rule order. A null value only
/// violates [`Rule::Required`]; other rules treat it as absent.
pub fn validate(schema: &Schema, record: &NormalizedRecord) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    for field in &schema.fields {
        let value = record.get(&field.name);
        for rule in &field.rules {
            if let Some(violation) = check_rule(rule, value) {
                out.push(FieldViolation {
                    field: field.name.clone(),
                    violation,
                });
            }
        }
    }
    out
}

/// Check a single rule. Returns `None` when the value satisfies it.
pub fn check_rule(rule: &Rule, value: &FieldValue) -> Option<Violation> {
    if value.is_null() {
        return matches!(rule, Rule::Required).then_some(Violation::Required);
    }

    match (rule, value) {
        (Rule::Required, _) => None,
        (Rule::MaxLength(max), FieldValue::Text(s)) => {
            let actual = s.chars().count();
            (actual > *max).then_some(Violation::MaxLength { max: *max, actual })
        }
        (Rule::MaxLength(_), _) => None,
        (Rule::Date, FieldValue::Date(_)) => None,
        (Rule::Date, FieldValue::Text(s)) => {
            dates::parse_date_text(s).is_none().then_some(Violation::Date)
        }
        (Rule::Date, _) => Some(Violation::Date),
        (Rule::Email, FieldValue::Text(s)) => (!is_email(s)).then_some(Violation::Email),
        (Rule::Email, _) => Some(Violation::Email),
        (Rule::OneOf(allowed), FieldValue::Text(s)) => {
            (!allowed.iter().any(|a| a == s)).then(|| Violation::NotInSet {
                allowed: allowed.clone(),
            })
        }
        (Rule::OneOf(allowed), _) => Some(Violation::NotInSet {
            allowed: allowed.clone(),
        }),
    }
}

/// Email shape check: a local part, an `@`, and a dotted domain.
pub fn is_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}
