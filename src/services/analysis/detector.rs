use crate::models::CellValue;

use super::types::ColumnType;
use super::utils::{coerce_number, parse_date};

/// Share of meaningful values that must agree before a column takes a type.
pub const TYPE_DETECTION_THRESHOLD: f64 = 0.8;

/// Majority-vote type detection. Numbers are checked before dates, so a
/// column of bare years is numeric. Columns with no meaningful values are
/// `String`.
pub fn detect_column_type(values: &[CellValue]) -> ColumnType {
    let (total, numeric_count, date_count) = values
        .iter()
        .filter(|v| v.is_meaningful())
        .fold((0usize, 0usize, 0usize), |(total, num, date), value| {
            (
                total + 1,
                num + coerce_number(value).is_some() as usize,
                date + parse_date(value).is_some() as usize,
            )
        });

    if total == 0 {
        return ColumnType::String;
    }

    let threshold = total as f64 * TYPE_DETECTION_THRESHOLD;
    match () {
        _ if numeric_count as f64 >= threshold => ColumnType::Number,
        _ if date_count as f64 >= threshold => ColumnType::Date,
        _ => ColumnType::String,
    }
}
