//! Row binding: data lines to [`RawRecord`]s.

use crate::error::BatchError;
use crate::models::{FieldKey, RawRecord};

use super::header::split_columns;
use super::normalize::{trim_blank, trim_blank_end};

/// Apply the per-field trim policy.
///
/// Email and legal name lose trailing whitespace only, so that leading and
/// doubled spaces still reach their format rules. Other fields are trimmed on
/// both ends.
pub fn trim_value(key: FieldKey, value: &str) -> &str {
    match key {
        FieldKey::EmailAddress | FieldKey::FullName => trim_blank_end(value),
        _ => trim_blank(value),
    }
}

/// Bind one data line to the header keys.
///
/// Missing cells leave their slot empty; extra cells are ignored.
pub fn parse_row(line: &str, header: &[FieldKey]) -> RawRecord {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let values = split_columns(line);

    let mut record = RawRecord::new();
    for (index, key) in header.iter().enumerate() {
        let value = values.get(index).map(|v| trim_value(*key, v).to_string());
        record.set(*key, value);
    }
    record
}

/// Bind every data line; an empty batch is rejected.
pub fn parse_rows(lines: &[&str], header: &[FieldKey]) -> Result<Vec<RawRecord>, BatchError> {
    let rows: Vec<RawRecord> = lines.iter().map(|line| parse_row(line, header)).collect();

    if rows.is_empty() {
        return Err(BatchError::EmptyBatch);
    }

    Ok(rows)
}
