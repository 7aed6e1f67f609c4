pub mod delimited;
pub mod utils;
pub mod xlsx;

pub use delimited::parse_delimited;
pub use xlsx::parse_workbook;

use crate::error::AppError;
use crate::models::Row;

/// Upstream size policy: the analysis only ever sees bounded row sets.
pub fn enforce_row_limit(rows: &[Row], max_rows: usize) -> Result<(), AppError> {
    if rows.len() > max_rows {
        tracing::warn!("Rejecting dataset with {} rows (limit {})", rows.len(), max_rows);
        return Err(AppError::PayloadTooLarge(format!(
            "Dataset has {} rows, limit is {}",
            rows.len(),
            max_rows
        )));
    }
    Ok(())
}

pub fn enforce_byte_limit(len: usize, max_file_size: usize) -> Result<(), AppError> {
    if len > max_file_size {
        tracing::warn!("Rejecting upload of {} bytes (limit {})", len, max_file_size);
        return Err(AppError::PayloadTooLarge(format!(
            "Upload is {}KB, limit is {}KB",
            len / 1024,
            max_file_size / 1024
        )));
    }
    Ok(())
}
