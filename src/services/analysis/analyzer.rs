use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use smallvec::SmallVec;

use crate::models::{CellValue, Row};

use super::charts::suggest_charts;
use super::detector::detect_column_type;
use super::types::*;
use super::utils::{coerce_number, parse_date};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

static MISSING: CellValue = CellValue::Null;

/// Runs the full analysis, using the current instant as the sentinel for
/// date columns where nothing parses.
pub fn analyse(rows: &[Row]) -> DatasetAnalysis {
    analyse_at(rows, Utc::now())
}

pub fn analyse_at(rows: &[Row], now: DateTime<Utc>) -> DatasetAnalysis {
    let start = std::time::Instant::now();

    let columns = profile_columns(rows, now);
    let chart_suggestions = suggest_charts(&columns);

    tracing::info!(
        "Analysed {} rows, {} columns, {} chart suggestions in {:?}",
        rows.len(),
        columns.len(),
        chart_suggestions.len(),
        start.elapsed()
    );

    DatasetAnalysis {
        row_count: rows.len(),
        columns,
        chart_suggestions,
    }
}

/// Profiles every column named by the first row, in its key order.
pub fn profile_columns(rows: &[Row], now: DateTime<Utc>) -> Vec<ColumnProfile> {
    let headers: Vec<&str> = rows.first().map(|row| row.keys().collect()).unwrap_or_default();

    headers
        .iter()
        .map(|name| {
            let values: Vec<&CellValue> = rows
                .iter()
                .map(|row| row.get(name).unwrap_or(&MISSING))
                .collect();
            analyze_column(name, &values, now)
        })
        .collect()
}

fn analyze_column(name: &str, values: &[&CellValue], now: DateTime<Utc>) -> ColumnProfile {
    let (meaningful, empty_values) = values.iter().fold(
        (Vec::with_capacity(values.len()), 0usize),
        |(mut meaningful, empties), value| {
            if value.is_empty() {
                (meaningful, empties + 1)
            } else {
                meaningful.push((*value).clone());
                (meaningful, empties)
            }
        },
    );

    let column_type = detect_column_type(&meaningful);

    let unique_values = meaningful
        .iter()
        .map(|value| value.to_string())
        .collect::<HashSet<_>>()
        .len();

    let sample_values: SmallVec<[CellValue; SAMPLE_SIZE]> =
        meaningful.iter().take(SAMPLE_SIZE).cloned().collect();

    let summary = match column_type {
        ColumnType::Number => ColumnSummary::Numeric(numeric_summary(&meaningful)),
        ColumnType::Date => ColumnSummary::Date(date_summary(&meaningful, now)),
        ColumnType::String => ColumnSummary::Categorical(categorical_summary(&meaningful)),
    };

    tracing::debug!(
        "Column {}: type {:?}, {} empty, {} unique",
        name,
        column_type,
        empty_values,
        unique_values
    );

    ColumnProfile {
        column: name.to_string(),
        column_type,
        empty_values,
        unique_values,
        sample_values,
        summary,
    }
}

pub fn numeric_summary(values: &[CellValue]) -> NumericSummary {
    let numbers: Vec<f64> = values.iter().filter_map(coerce_number).collect();
    if numbers.is_empty() {
        return NumericSummary::empty();
    }

    let (min, max, sum) = numbers.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), &n| (min.min(n), max.max(n), sum + n),
    );
    let count = numbers.len();

    NumericSummary {
        min,
        max,
        sum,
        average: sum / count as f64,
        count,
    }
}

pub fn date_summary(values: &[CellValue], now: DateTime<Utc>) -> DateSummary {
    let mut dates: Vec<DateTime<Utc>> = values.iter().filter_map(parse_date).collect();
    dates.sort();

    match (dates.first(), dates.last()) {
        (Some(&start), Some(&end)) => DateSummary {
            start,
            end,
            granularity: granularity_for_span(span_in_days(start, end)),
        },
        _ => DateSummary {
            start: now,
            end: now,
            granularity: Granularity::Month,
        },
    }
}

fn span_in_days(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Largest bucket first; the first threshold the span exceeds wins.
pub fn granularity_for_span(days: f64) -> Granularity {
    match days {
        d if d > 730.0 => Granularity::Year,
        d if d > 180.0 => Granularity::Quarter,
        d if d > 90.0 => Granularity::Month,
        d if d > 30.0 => Granularity::Week,
        _ => Granularity::Day,
    }
}

pub fn categorical_summary(values: &[CellValue]) -> CategoricalSummary {
    // value -> (first-seen index, count)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for value in values {
        let next_index = counts.len();
        counts.entry(value.to_string()).or_insert((next_index, 0)).1 += 1;
    }

    let mut tallies: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(value, (index, count))| (value, index, count))
        .collect();
    tallies.sort_by_key(|(_, index, count)| (Reverse(*count), *index));

    CategoricalSummary {
        top_values: tallies
            .into_iter()
            .take(TOP_VALUES)
            .map(|(value, _, count)| ValueCount { value, count })
            .collect(),
    }
}
