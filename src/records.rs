//! Typed records built from validated [`NormalizedRecord`]s.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::types::NormalizedRecord;

/// Access to a record's natural-key values, used by stores to enforce uniqueness.
pub trait Keyed {
    /// Value of `field` if it is a key field and present.
    fn key(&self, field: &str) -> Option<&str>;
}

/// An employee record as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colaborator {
    pub document_type: String,
    pub document_number: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: NaiveDate,
    pub personal_email: String,
    pub corporate_email: Option<String>,
    pub mobile: String,
    pub phone: Option<String>,
    pub address: String,
    pub residential_city: String,
    pub education_level: String,
    pub job_position: String,
    pub hire_date: NaiveDate,
    pub status: bool,
    pub notes: Option<String>,
}

impl TryFrom<&NormalizedRecord> for Colaborator {
    type Error = RecordError;

    fn try_from(r: &NormalizedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            document_type: required_text(r, "document_type")?,
            document_number: required_text(r, "document_number")?,
            first_name: required_text(r, "first_name")?,
            last_name: required_text(r, "last_name")?,
            gender: required_text(r, "gender")?,
            birth_date: required_date(r, "birth_date")?,
            personal_email: required_text(r, "personal_email")?,
            corporate_email: optional_text(r, "corporate_email"),
            mobile: required_text(r, "mobile")?,
            phone: optional_text(r, "phone"),
            address: required_text(r, "address")?,
            residential_city: required_text(r, "residential_city")?,
            education_level: required_text(r, "education_level")?,
            job_position: required_text(r, "job_position")?,
            hire_date: required_date(r, "hire_date")?,
            status: required_bool(r, "status")?,
            notes: optional_text(r, "notes"),
        })
    }
}

impl Keyed for Colaborator {
    fn key(&self, field: &str) -> Option<&str> {
        match field {
            "document_number" => Some(&self.document_number),
            "personal_email" => Some(&self.personal_email),
            "corporate_email" => self.corporate_email.as_deref(),
            _ => None,
        }
    }
}

/// A back-office user account as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub status: bool,
}

impl TryFrom<&NormalizedRecord> for User {
    type Error = RecordError;

    fn try_from(r: &NormalizedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required_text(r, "name")?,
            email: required_text(r, "email")?,
            role: optional_text(r, "role"),
            status: required_bool(r, "status")?,
        })
    }
}

impl Keyed for User {
    fn key(&self, field: &str) -> Option<&str> {
        match field {
            "email" => Some(&self.email),
            _ => None,
        }
    }
}

fn missing(field: &str) -> RecordError {
    RecordError::Missing {
        field: field.to_string(),
    }
}

fn required_text(r: &NormalizedRecord, field: &str) -> Result<String, RecordError> {
    r.text(field).map(str::to_string).ok_or_else(|| missing(field))
}

fn optional_text(r: &NormalizedRecord, field: &str) -> Option<String> {
    r.text(field).map(str::to_string)
}

fn required_date(r: &NormalizedRecord, field: &str) -> Result<NaiveDate, RecordError> {
    if r.get(field).is_null() {
        return Err(missing(field));
    }
    r.date(field).ok_or_else(|| RecordError::Invalid {
        field: field.to_string(),
        message: format!("'{}' is not a date", r.get(field)),
    })
}

fn required_bool(r: &NormalizedRecord, field: &str) -> Result<bool, RecordError> {
    r.bool(field).ok_or_else(|| missing(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;

    fn user_record() -> NormalizedRecord {
        let mut r = NormalizedRecord::new(2);
        r.set("name", FieldValue::Text("Ana".into()));
        r.set("email", FieldValue::Text("ana@example.com".into()));
        r.set("role", FieldValue::Null);
        r.set("status", FieldValue::Bool(true));
        r
    }

    #[test]
    fn builds_user_from_record() {
        let user = User::try_from(&user_record()).unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.role, None);
        assert_eq!(user.key("email"), Some("ana@example.com"));
        assert_eq!(user.key("name"), None);
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let mut r = user_record();
        r.set("status", FieldValue::Null);
        assert_eq!(
            User::try_from(&r).unwrap_err(),
            RecordError::Missing {
                field: "status".to_string()
            }
        );
    }

    #[test]
    fn text_dates_are_parsed_on_construction() {
        let mut r = NormalizedRecord::new(2);
        r.set("hire_date", FieldValue::Text("2021-03-01".into()));
        assert_eq!(
            required_date(&r, "hire_date").unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
        );
        r.set("hire_date", FieldValue::Text("soon".into()));
        assert!(matches!(
            required_date(&r, "hire_date"),
            Err(RecordError::Invalid { .. })
        ));
    }
}
