//! Failure reporting for a batch.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// The rule a field failed, or the row-level condition that kept it out of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    Required,
    MaxLength { max: usize, actual: usize },
    Date,
    Email,
    NotInSet { allowed: Vec<String> },
    /// The field's value already exists in the store (only under
    /// [`super::DuplicatePolicy::Report`]).
    Duplicate,
    /// The store rejected the insert, or the record could not be built.
    Persistence { message: String },
}

impl Violation {
    /// Whether this entry counts as a failed row. Duplicates are reported but not failures.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Duplicate)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("is required"),
            Self::MaxLength { max, actual } => {
                write!(f, "must be at most {max} characters (got {actual})")
            }
            Self::Date => f.write_str("is not a valid date"),
            Self::Email => f.write_str("is not a valid email address"),
            Self::NotInSet { allowed } => write!(f, "must be one of [{}]", allowed.join(", ")),
            Self::Duplicate => f.write_str("already exists"),
            Self::Persistence { message } => write!(f, "could not be saved: {message}"),
        }
    }
}

/// One failed rule for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub violation: Violation,
}

/// One report line: a violation located by row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// 1-based spreadsheet row number.
    pub row: usize,
    pub field: String,
    pub violation: Violation,
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: '{}' {}", self.row, self.field, self.violation)
    }
}

/// Ordered list of every problem found in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    pub entries: Vec<ReportEntry>,
}

impl ValidationReport {
    /// Record all violations of a row at once.
    pub fn record_row(&mut self, row: usize, violations: Vec<FieldViolation>) {
        self.entries.extend(violations.into_iter().map(|v| ReportEntry {
            row,
            field: v.field,
            violation: v.violation,
        }));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Rows with at least one failing entry, ascending.
    pub fn failed_rows(&self) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|e| e.violation.is_failure())
            .map(|e| e.row)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// All entries for one row.
    pub fn for_row(&self, row: usize) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(move |e| e.row == row)
    }
}

/// Outcome of one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ImportSummary {
    /// Rows inserted into the store.
    pub imported: usize,
    /// Rows left out because a natural key already existed.
    pub skipped_duplicates: usize,
    pub report: ValidationReport,
}

impl ImportSummary {
    /// Number of rows that failed validation or persistence.
    pub fn failed(&self) -> usize {
        self.report.failed_rows().len()
    }

    /// Entries for one row, for on-demand detail.
    pub fn violations_for(&self, row: usize) -> Vec<&ReportEntry> {
        self.report.for_row(row).collect()
    }
}

fn rows(n: usize) -> &'static str {
    if n == 1 { "row" } else { "rows" }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} imported", self.imported, rows(self.imported))?;
        let failed = self.failed();
        write!(f, ", {failed} {} failed", rows(failed))?;
        if self.skipped_duplicates > 0 {
            write!(
                f,
                ", {} {} skipped as duplicates",
                self.skipped_duplicates,
                rows(self.skipped_duplicates)
            )?;
        }
        Ok(())
    }
}
