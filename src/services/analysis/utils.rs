use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::CellValue;

// Cheap shape check before trying the chrono formats one by one.
static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}[-/]\d{1,2}([-/]\d{1,2})?([T ].+)?|\d{1,2}[-/]\d{1,2}[-/]\d{4})$")
        .expect("date shape pattern is valid")
});

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Numeric coercion shared by type detection and the numeric summary.
/// Booleans and dates never coerce, and non-finite results are rejected.
pub fn coerce_number(value: &CellValue) -> Option<f64> {
    let n = match value {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Timestamp parsing shared by type detection and the date summary.
pub fn parse_date(value: &CellValue) -> Option<DateTime<Utc>> {
    match value {
        CellValue::Date(d) => Some(*d),
        CellValue::Text(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if !DATE_SHAPE.is_match(s) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS.iter() {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    for format in DATE_FORMATS.iter() {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    // Year-month only, pinned to the first of the month
    NaiveDate::parse_from_str(&format!("{}-01", s.replace('/', "-")), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
