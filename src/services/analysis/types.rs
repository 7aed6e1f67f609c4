use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

use crate::models::{format_timestamp, CellValue};

pub const SAMPLE_SIZE: usize = 5;
pub const TOP_VALUES: usize = 5;
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    Date,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub average: f64,
    pub count: usize,
}

impl NumericSummary {
    pub fn empty() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            sum: 0.0,
            average: 0.0,
            count: 0,
        }
    }
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateSummary {
    #[serde(serialize_with = "serialize_timestamp")]
    pub start: DateTime<Utc>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub end: DateTime<Utc>,
    pub granularity: Granularity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalSummary {
    pub top_values: Vec<ValueCount>,
}

/// The shape of the summary already tells the variants apart, so it is
/// serialized without a tag; the profile's `type` field carries it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Date(DateSummary),
    Categorical(CategoricalSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    pub column: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub empty_values: usize,
    pub unique_values: usize,
    pub sample_values: SmallVec<[CellValue; SAMPLE_SIZE]>,
    pub summary: ColumnSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Area,
    Table,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Axis {
    Column(String),
    Columns(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSuggestion {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub label: String,
    pub x_axis: Option<String>,
    pub y_axis: Axis,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetAnalysis {
    pub row_count: usize,
    pub columns: Vec<ColumnProfile>,
    pub chart_suggestions: Vec<ChartSuggestion>,
}
