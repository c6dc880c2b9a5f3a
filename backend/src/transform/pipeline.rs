//! High-level pipeline API: CSV text in, [`ValidationOutcome`] out.
//!
//! ```text
//! normalize ─▶ header ─▶ rows ─▶ field rules ─▶ uniqueness ─▶ values
//! ```
//!
//! Each stage short-circuits: the first rejection is the outcome and later
//! stages never run. Nothing is kept between calls.
//!
//! # Example
//!
//! ```rust,ignore
//! use learnerload::validate;
//!
//! let csv = "Email,Legal name,Student ID,Date of Birth (MM/DD/YYYY),Pass (Yes/No),Date taken (MM/DD/YYYY)\r\n\
//!            john@x.com,John Smith,S100,01/15/2000,Yes,06/01/2023";
//! let outcome = validate(csv);
//! assert!(outcome.is_valid());
//! ```

use std::path::Path;

use chrono::{DateTime, Local, TimeZone};

use crate::api::logs::{log_error, log_info, log_success};
use crate::error::{BatchError, PipelineResult};
use crate::models::ValidationOutcome;
use crate::parser::{decode_bytes, normalize, parse_rows, read_csv_file, validate_header};
use crate::validation::{ensure_unique, validate_rows};

use super::values::transform_records;

/// Validate and convert a batch against the current local time.
pub fn validate(raw: &str) -> ValidationOutcome {
    validate_at(raw, &Local::now())
}

/// Validate and convert a batch as of `now`.
///
/// `now` bounds `Date taken` and supplies its time of day.
pub fn validate_at<Tz: TimeZone>(raw: &str, now: &DateTime<Tz>) -> ValidationOutcome {
    match run(raw, now) {
        Ok(outcome) => outcome,
        Err(err) => {
            log_error(err.to_string());
            ValidationOutcome::Invalid(err)
        }
    }
}

fn run<Tz: TimeZone>(raw: &str, now: &DateTime<Tz>) -> Result<ValidationOutcome, BatchError> {
    log_info("Normalizing lines...");
    let normalized = normalize(raw);

    log_info("Checking column headings...");
    let header = validate_header(normalized.header_line())?;

    let rows = parse_rows(&normalized.data_lines(), &header)?;
    log_success(format!("Read {} rows", rows.len()));

    log_info("Checking fields...");
    validate_rows(&rows, now)?;

    log_info("Checking emails and student IDs are unique...");
    ensure_unique(&rows)?;

    let records = transform_records(&rows, now)?;
    log_success(format!("{} learner records ready", records.len()));

    Ok(ValidationOutcome::Valid {
        records,
        processed_csv: normalized.into_string(),
    })
}

/// Decode uploaded bytes, then [`validate`].
pub fn validate_bytes(bytes: &[u8]) -> ValidationOutcome {
    validate(&decode_bytes(bytes))
}

/// Read a CSV file from disk, then [`validate`].
pub fn validate_file<P: AsRef<Path>>(path: P) -> PipelineResult<ValidationOutcome> {
    let text = read_csv_file(path)?;
    Ok(validate(&text))
}
