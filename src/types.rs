//! Row-level data model shared by intake and the import pipeline.
//!
//! A [`RawRow`] is what a reader produces for one spreadsheet line; the normalizer turns it
//! into a [`NormalizedRecord`] whose values are canonical [`FieldValue`]s.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::NaiveDate;

use crate::pipeline::dates;

/// A raw cell as read from the input file, before any normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing/empty cell.
    Empty,
    /// Numeric cell. Spreadsheet date cells arrive here as serials.
    Number(f64),
    /// Text cell.
    Text(String),
    /// Boolean cell.
    Bool(bool),
}

impl CellValue {
    /// Returns `true` for [`CellValue::Empty`] and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Textual rendering used by the normalizer.
    ///
    /// Whole numbers render without a fractional part (`12345.0` → `"12345"`), booleans as
    /// `"1"`/`"0"`, and empty cells as `""`.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(f) => number_to_text(*f),
            Self::Text(s) => s.clone(),
            Self::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        }
    }
}

fn number_to_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        Self::Number(f)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        Self::Number(i as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One data line of the imported file, keyed by canonical column name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    /// 1-based spreadsheet row number (the header is row 1).
    pub row: usize,
    /// Cells by canonical column name. Columns absent from the input are simply missing.
    pub cells: HashMap<String, CellValue>,
}

impl RawRow {
    /// Create an empty row with the given row number.
    pub fn new(row: usize) -> Self {
        Self {
            row,
            cells: HashMap::new(),
        }
    }

    /// Builder-style helper to set a cell.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Set a cell in place.
    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.insert(column.into(), value);
    }

    /// Returns the cell for `column`, or [`CellValue::Empty`] when absent.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }
}

/// A canonical value produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Absent, empty, or not coercible.
    Null,
    Text(String),
    Date(NaiveDate),
    Bool(bool),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text content, if this value is [`FieldValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Key representation used for uniqueness lookups. `None` for null and empty values.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) if s.is_empty() => None,
            Self::Text(s) => Some(s.clone()),
            Self::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Self::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

static NULL_VALUE: FieldValue = FieldValue::Null;

/// A row after normalization: canonical field name → canonical value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedRecord {
    /// Row number carried over from the [`RawRow`].
    pub row: usize,
    /// Canonical values. Every schema field has an entry, possibly [`FieldValue::Null`].
    pub values: BTreeMap<String, FieldValue>,
}

impl NormalizedRecord {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            values: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.values.insert(field.into(), value);
    }

    /// Returns the value for `field`, or [`FieldValue::Null`] when absent.
    pub fn get(&self, field: &str) -> &FieldValue {
        self.values.get(field).unwrap_or(&NULL_VALUE)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).as_text()
    }

    /// Date value of `field`; pass-through text is parsed with the accepted date formats.
    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        match self.get(field) {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(s) => dates::parse_date_text(s),
            _ => None,
        }
    }

    pub fn bool(&self, field: &str) -> Option<bool> {
        match self.get(field) {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}
