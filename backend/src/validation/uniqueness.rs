//! Batch-level uniqueness of emails and student IDs.

use std::collections::HashSet;

use crate::error::BatchError;
use crate::models::{FieldKey, RawRecord};

fn all_distinct(rows: &[RawRecord], key: FieldKey) -> bool {
    let distinct: HashSet<Option<&str>> = rows.iter().map(|row| row.get(key)).collect();
    distinct.len() == rows.len()
}

/// Reject the batch when two rows share an email or a student ID.
///
/// Values are compared exactly (case-sensitive). Emails are checked first.
pub fn ensure_unique(rows: &[RawRecord]) -> Result<(), BatchError> {
    if !all_distinct(rows, FieldKey::EmailAddress) {
        return Err(BatchError::DuplicateEmail);
    }
    if !all_distinct(rows, FieldKey::StudentId) {
        return Err(BatchError::DuplicateStudentId);
    }
    Ok(())
}
