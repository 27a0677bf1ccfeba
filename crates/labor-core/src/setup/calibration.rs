//! Calibration Loading
//!
//! Reads the salary scale from a calibration CSV: the value in the named
//! column of the first data row.

use std::fs;
use std::path::Path;

/// Calibration error type
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("calibration file has no column named {0:?}")]
    MissingColumn(String),
    #[error("calibration file has no data rows")]
    MissingRow,
    #[error("salary scale {value:?} is not a number")]
    InvalidValue { value: String },
    #[error("salary scale must be positive and finite, got {0}")]
    NonPositive(f64),
}

/// Load the salary scale from a CSV file
pub fn load_salary_scale(path: impl AsRef<Path>, column: &str) -> Result<f64, CalibrationError> {
    let content = fs::read_to_string(path.as_ref())?;
    let scale = parse_salary_scale(&content, column)?;
    tracing::info!(
        "Loaded salary scale {} from {} ({:?})",
        scale,
        path.as_ref().display(),
        column
    );
    Ok(scale)
}

/// Parse the salary scale from CSV text
pub fn parse_salary_scale(content: &str, column: &str) -> Result<f64, CalibrationError> {
    let mut lines = content
        .trim_start_matches('\u{feff}')
        .lines()
        .filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| CalibrationError::MissingColumn(column.to_string()))?;
    let index = split_record(header)
        .iter()
        .position(|name| name == column)
        .ok_or_else(|| CalibrationError::MissingColumn(column.to_string()))?;

    let row = lines.next().ok_or(CalibrationError::MissingRow)?;
    let raw = split_record(row)
        .into_iter()
        .nth(index)
        .ok_or(CalibrationError::MissingRow)?;

    let scale: f64 = raw
        .parse()
        .map_err(|_| CalibrationError::InvalidValue { value: raw.clone() })?;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(CalibrationError::NonPositive(scale));
    }
    Ok(scale)
}

/// Splits one CSV record, honoring double-quoted fields
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}
