//! Spreadsheet date handling.
//!
//! Spreadsheets in the 1900 date system count days from 1900-01-01 = 1 and include the
//! non-existent 1900-02-29 as serial 60. Conversion here reproduces that offset by anchoring
//! at 1900-01-01 and adding `serial - 2` days, so serial 1 lands on 1899-12-31 and serial 60
//! on 1900-02-28.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::types::CellValue;

/// Serials outside this range are not dates (roughly year 10000).
const MAX_SERIAL: f64 = 2_958_465.0;

/// Slashed and dashed numeric dates read day first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
];

/// Convert a spreadsheet serial into a calendar date. Fractional parts (time of day) are
/// truncated.
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial.abs() > MAX_SERIAL {
        return None;
    }
    let days = serial.trunc() as i64 - 2;
    let anchor = NaiveDate::from_ymd_opt(1900, 1, 1)?;
    anchor.checked_add_signed(TimeDelta::try_days(days)?)
}

/// Returns the serial carried by a cell: numeric cells, and text that is entirely numeric.
pub fn numeric_serial(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(f) => Some(*f),
        CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Parse a pre-formatted date string using the accepted formats.
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}
