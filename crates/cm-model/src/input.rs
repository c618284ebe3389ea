//! Parsing of raw user input before it reaches [`MatrixState`](crate::MatrixState).

use crate::error::{ModelError, Result};
use crate::{MAX_CLASSES, MIN_CLASSES};

/// Parse a cell entry as a non-negative integer count.
///
/// For text-entry front ends that receive the raw field contents; session
/// files carry numbers and go through [`cell_value_from_i64`] instead.
/// Surrounding whitespace is ignored. Negative numbers, fractions and
/// anything non-numeric are rejected.
///
/// # Errors
///
/// Returns [`ModelError::InvalidCellValue`] carrying the raw input.
pub fn parse_cell_value(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    // u64::from_str accepts a leading '+', which a count field should not.
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModelError::InvalidCellValue {
            input: raw.to_string(),
        });
    }
    trimmed.parse().map_err(|_| ModelError::InvalidCellValue {
        input: raw.to_string(),
    })
}

/// Convert a signed cell value (e.g. from a config file) to a count.
///
/// # Errors
///
/// Returns [`ModelError::InvalidCellValue`] for negative values.
pub fn cell_value_from_i64(value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| ModelError::InvalidCellValue {
        input: value.to_string(),
    })
}

/// Parse a class count typed as text, such as a command-line argument.
///
/// # Errors
///
/// Returns [`ModelError::ClassCountOutOfRange`] outside `2..=20`. Text that
/// is not a number is reported as a requested count of 0.
pub fn parse_class_count(raw: &str) -> Result<usize> {
    let requested = raw.trim().parse::<usize>().unwrap_or(0);
    check_class_count(requested)
}

/// Validate a class count against the supported range.
///
/// # Errors
///
/// Returns [`ModelError::ClassCountOutOfRange`] outside `2..=20`.
pub fn check_class_count(requested: usize) -> Result<usize> {
    if (MIN_CLASSES..=MAX_CLASSES).contains(&requested) {
        Ok(requested)
    } else {
        Err(ModelError::ClassCountOutOfRange { requested })
    }
}
