use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// A single loosely-typed cell as it arrives from upstream ingestion.
///
/// JSON strings always land in `Text`; `Date` is only produced by sources
/// that carry native dates (spreadsheet date cells).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    #[serde(skip_deserializing)]
    Date(DateTime<Utc>),
}

impl CellValue {
    /// Null and the empty string are "empty"; everything else, including
    /// whitespace-only text, carries meaning.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn is_meaningful(&self) -> bool {
        !self.is_empty()
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            // f64's Display already drops the fraction on integral values
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Date(d) => f.write_str(&format_timestamp(d)),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Date(d) => serializer.serialize_str(&format_timestamp(d)),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::Date(value)
    }
}

/// One record of a dataset: column name to cell, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_empty)
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn number_and_text_share_string_form() {
        assert_eq!(CellValue::from(1i64).to_string(), "1");
        assert_eq!(CellValue::from("1").to_string(), "1");
        assert_eq!(CellValue::from(1.5).to_string(), "1.5");
        assert_eq!(CellValue::from(true).to_string(), "true");
    }

    #[test]
    fn dates_render_as_iso_millis() {
        let d = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(CellValue::Date(d).to_string(), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn emptiness_only_covers_null_and_empty_string() {
        assert!(CellValue::Null.is_empty());
        assert!(CellValue::from("").is_empty());
        assert!(CellValue::from(" ").is_meaningful());
        assert!(CellValue::from(0i64).is_meaningful());
        assert!(CellValue::from(false).is_meaningful());
    }

    #[test]
    fn rows_deserialize_in_key_order() {
        let row: Row = serde_json::from_str(r#"{"b": 1, "a": "x", "c": null, "d": true}"#).unwrap();
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["b", "a", "c", "d"]);
        assert_eq!(row.get("b"), Some(&CellValue::Number(1.0)));
        assert_eq!(row.get("a"), Some(&CellValue::Text("x".into())));
        assert_eq!(row.get("c"), Some(&CellValue::Null));
        assert_eq!(row.get("d"), Some(&CellValue::Bool(true)));
    }
}
