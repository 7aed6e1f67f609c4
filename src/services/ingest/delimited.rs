use csv::{ReaderBuilder, Trim};

use crate::error::AppError;
use crate::models::{CellValue, Row};

use super::utils::clean_headers;

/// Parses delimited text into rows keyed by the (cleaned) header record.
/// Every cell stays `Text`; coercion is left to the analysis.
pub fn parse_delimited(content: &str, delimiter: u8) -> Result<Vec<Row>, AppError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::None)
        .flexible(true) // Allow rows with different lengths
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::ParseError(format!("Failed to read header row: {}", e)))?
        .clone();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::InvalidInput("Missing header row".to_string()));
    }

    let headers = clean_headers(headers.iter());
    tracing::debug!("Delimited headers: {:?}", headers);

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AppError::ParseError(format!("Failed to parse row {}: {}", index + 1, e))
        })?;

        // A short record leaves its trailing columns missing; extra fields are dropped
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(name, field)| (name.as_str(), CellValue::from(field)))
            .collect();

        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    tracing::info!("Parsed {} delimited rows with {} columns", rows.len(), headers.len());
    Ok(rows)
}
