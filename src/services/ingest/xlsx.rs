use std::io::Cursor;

use bytes::Bytes;
use calamine::{open_workbook_from_rs, Data, DataType, Reader, Xlsx};
use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::AppError;
use crate::models::{CellValue, Row};

use super::utils::clean_headers;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Reads the first worksheet of an XLSX workbook. The first row is the
/// header; entirely empty rows are skipped.
pub fn parse_workbook(file_data: Bytes) -> Result<Vec<Row>, AppError> {
    let start = std::time::Instant::now();
    let cursor = Cursor::new(file_data);

    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor).map_err(|e| {
        tracing::error!("Failed to open Excel file: {}", e);
        AppError::FileProcessingError(format!("Failed to open Excel file: {}", e))
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::FileProcessingError("No sheets found in workbook".to_string()))?;
    tracing::info!("Reading worksheet {}", sheet_name);

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut sheet_rows = range.rows();

    let headers = match sheet_rows.next() {
        Some(header_row) if header_row.iter().any(|cell| !cell.is_empty()) => {
            let raw: Vec<String> = header_row.iter().map(|cell| cell.to_string()).collect();
            clean_headers(raw.iter().map(String::as_str))
        }
        _ => return Err(AppError::InvalidInput("Missing header row".to_string())),
    };

    let rows: Vec<Row> = sheet_rows
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(idx, name)| (name.as_str(), cells.get(idx).map(cell_value).unwrap_or(CellValue::Null)))
                .collect::<Row>()
        })
        .filter(|row| !row.is_blank())
        .collect();

    tracing::info!(
        "Read {} rows x {} columns from {} in {:?}",
        rows.len(),
        headers.len(),
        sheet_name,
        start.elapsed()
    );
    Ok(rows)
}

pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::DateTime(d) => excel_serial_to_datetime(d.as_f64())
            .map(CellValue::Date)
            .unwrap_or(CellValue::Null),
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

/// Excel serial dates count days from 1899-12-30 (which absorbs the
/// 1900 leap-year bug for any date after February 1900).
pub fn excel_serial_to_datetime(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    epoch
        .checked_add_signed(Duration::milliseconds(millis))
        .map(|naive| naive.and_utc())
}
