//! Target schemas: the canonical fields of each import target, how each field is normalized,
//! and the declarative rule table the validator evaluates.
//!
//! Enumeration tables live in [`Catalogs`] and are injected when a schema is built, so the
//! same rule table can be exercised with alternative catalogs (e.g. loaded from
//! [`crate::config::ImportConfig`]).

use serde::{Deserialize, Serialize};

/// Maximum length of email columns.
pub const EMAIL_MAX_LEN: usize = 255;

/// Allowed values for enumerated colaborator fields.
///
/// Values are stored upper-cased; the normalizer upper-cases input before checking
/// membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalogs {
    pub document_types: Vec<String>,
    pub genders: Vec<String>,
    pub education_levels: Vec<String>,
    pub job_positions: Vec<String>,
}

impl Default for Catalogs {
    fn default() -> Self {
        Self {
            document_types: upper_list(&["CC", "CE", "TI"]),
            genders: upper_list(&["M", "F", "O"]),
            education_levels: upper_list(&["BACHILLER", "TECNICO", "TECNOLOGO", "PROFESIONAL"]),
            job_positions: upper_list(&["JEFE DE PROYECTO", "DESARROLLADOR", "ANALISTA", "TESTER"]),
        }
    }
}

impl Catalogs {
    /// Returns a copy with every entry trimmed and upper-cased.
    ///
    /// Applied to catalogs coming from configuration so membership checks stay consistent
    /// with the normalizer.
    pub fn canonicalized(&self) -> Self {
        let canon = |v: &[String]| -> Vec<String> {
            v.iter().map(|s| s.trim().to_uppercase()).collect()
        };
        Self {
            document_types: canon(&self.document_types),
            genders: canon(&self.genders),
            education_levels: canon(&self.education_levels),
            job_positions: canon(&self.job_positions),
        }
    }
}

fn upper_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.trim().to_uppercase()).collect()
}

/// How a field's raw cell is coerced into its canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Spreadsheet serial or pass-through date text.
    Date,
    /// Trimmed, upper-cased, and checked against the allowed set.
    Enum(Vec<String>),
    /// Non-digits stripped, truncated to `max` characters.
    Digits { max: usize },
    /// Trimmed, upper-cased, truncated to `max` characters.
    UpperText { max: usize },
    /// Trimmed, case-folded, truncated to `max` characters.
    Email { max: usize },
    /// "activo"/"1" → true, "inactivo"/"0" → false.
    Status,
    /// Trimmed only.
    FreeText,
}

/// One validation rule of the declarative rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// The value must not be null.
    Required,
    /// Text values must be at most this many characters.
    MaxLength(usize),
    /// The value must be a calendar date.
    Date,
    /// The value must look like an email address.
    Email,
    /// The value must be one of the listed values.
    OneOf(Vec<String>),
}

/// A single canonical field of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Canonical field name (also the expected header name).
    pub name: String,
    pub kind: FieldKind,
    /// Rules evaluated, in order, by the validator.
    pub rules: Vec<Rule>,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, kind: FieldKind, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            kind,
            rules,
        }
    }

    /// Whether the field carries a [`Rule::Required`].
    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }
}

/// The fixed target shape of one import flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Singular record name used in messages (e.g. `"colaborator"`).
    pub record_name: String,
    /// Ordered list of fields; also the column order of the template.
    pub fields: Vec<Field>,
    /// Natural keys probed by the duplicate guard, in order.
    pub unique_keys: Vec<String>,
}

impl Schema {
    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns a field by name, if present.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of fields that must be present as header columns.
    pub fn required_columns(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.name.as_str())
    }

    /// Employee records.
    pub fn colaborators(catalogs: &Catalogs) -> Self {
        use FieldKind as K;
        use Rule as R;

        let enum_field = |name: &str, allowed: &[String], max: usize| {
            Field::new(
                name,
                K::Enum(allowed.to_vec()),
                vec![R::Required, R::MaxLength(max), R::OneOf(allowed.to_vec())],
            )
        };
        let upper = |name: &str, max: usize| {
            Field::new(name, K::UpperText { max }, vec![R::Required, R::MaxLength(max)])
        };
        let date = |name: &str| Field::new(name, K::Date, vec![R::Required, R::Date]);

        Self {
            record_name: "colaborator".to_string(),
            fields: vec![
                enum_field("document_type", &catalogs.document_types, 15),
                Field::new(
                    "document_number",
                    K::Digits { max: 20 },
                    vec![R::Required, R::MaxLength(20)],
                ),
                upper("first_name", 100),
                upper("last_name", 100),
                enum_field("gender", &catalogs.genders, 20),
                date("birth_date"),
                Field::new(
                    "personal_email",
                    K::Email { max: EMAIL_MAX_LEN },
                    vec![R::Required, R::Email, R::MaxLength(EMAIL_MAX_LEN)],
                ),
                Field::new(
                    "corporate_email",
                    K::Email { max: EMAIL_MAX_LEN },
                    vec![R::Email, R::MaxLength(EMAIL_MAX_LEN)],
                ),
                Field::new("mobile", K::Digits { max: 15 }, vec![R::Required, R::MaxLength(15)]),
                Field::new("phone", K::Digits { max: 15 }, vec![R::MaxLength(15)]),
                upper("address", 150),
                upper("residential_city", 100),
                enum_field("education_level", &catalogs.education_levels, 100),
                enum_field("job_position", &catalogs.job_positions, 100),
                date("hire_date"),
                Field::new("status", K::Status, vec![R::Required]),
                Field::new("notes", K::FreeText, vec![R::MaxLength(255)]),
            ],
            unique_keys: vec![
                "document_number".to_string(),
                "personal_email".to_string(),
                "corporate_email".to_string(),
            ],
        }
    }

    /// Back-office user accounts.
    pub fn users() -> Self {
        use FieldKind as K;
        use Rule as R;

        Self {
            record_name: "user".to_string(),
            fields: vec![
                Field::new("name", K::FreeText, vec![R::Required, R::MaxLength(255)]),
                Field::new(
                    "email",
                    K::Email { max: EMAIL_MAX_LEN },
                    vec![R::Required, R::Email, R::MaxLength(EMAIL_MAX_LEN)],
                ),
                Field::new("role", K::FreeText, vec![R::MaxLength(255)]),
                Field::new("status", K::Status, vec![R::Required]),
            ],
            unique_keys: vec!["email".to_string()],
        }
    }
}

/// The import flows this crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportTarget {
    Colaborators,
    Users,
}

impl ImportTarget {
    /// Build the schema for this target.
    pub fn schema(&self, catalogs: &Catalogs) -> Schema {
        match self {
            Self::Colaborators => Schema::colaborators(catalogs),
            Self::Users => Schema::users(),
        }
    }
}
