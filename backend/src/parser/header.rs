//! Template header check.

use crate::error::BatchError;
use crate::models::{template_headers, FieldKey};

use super::normalize::trim_blank;

/// True for the characters that separate cells.
pub fn is_column_separator(c: char) -> bool {
    c == ',' || c == ';'
}

/// Split one line into cells on `,` or `;`.
///
/// Cells are returned untrimmed.
pub fn split_columns(line: &str) -> Vec<&str> {
    line.split(is_column_separator).collect()
}

/// Check row 1 against the template and bind each position to its key.
///
/// The check is all-or-nothing: every trimmed cell must equal the template
/// title at the same position, with the same number of cells.
pub fn validate_header(line: &str) -> Result<Vec<FieldKey>, BatchError> {
    let cells = split_columns(line);
    let expected = template_headers();

    if cells.len() != expected.len() {
        return Err(BatchError::HeaderMismatch);
    }

    cells
        .iter()
        .zip(expected)
        .map(|(cell, label)| {
            let cell = trim_blank(cell);
            if cell == label {
                FieldKey::from_label(cell).ok_or(BatchError::HeaderMismatch)
            } else {
                Err(BatchError::HeaderMismatch)
            }
        })
        .collect()
}
