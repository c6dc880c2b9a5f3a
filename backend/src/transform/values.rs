//! Conversion of validated rows into [`TypedLearnerRecord`]s.
//!
//! - `dateOfBirth` becomes an ISO-8601 timestamp at UTC midnight.
//! - `pass` becomes `true` for `yes` in any case.
//! - `dateTaken` keeps only its calendar date: year, month and day are
//!   stamped onto the current local time, so the time of day is whatever the
//!   clock read when the batch was converted.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Offset, TimeZone, Utc};

use crate::error::BatchError;
use crate::models::{js_timestamp, FieldKey, RawRecord, TypedLearnerRecord};
use crate::validation::{violation, Check, Pattern};

use super::dates::parse_template_date;

/// `MM/DD/YYYY` to `YYYY-MM-DDT00:00:00.000Z`.
pub fn date_of_birth_iso(value: &str) -> Option<String> {
    let date = parse_template_date(value)?;
    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    Some(js_timestamp(&midnight))
}

/// `MM/DD/YYYY` to that calendar day in `now`'s zone at `now`'s time of day.
///
/// The date is built in one step, so a `now` on the 31st never pushes a
/// shorter month forward (setting year, month and day one field at a time
/// on today's date would turn `06/01/2023` into 1 July when run on 31 January).
pub fn date_taken_at<Tz: TimeZone>(value: &str, now: &DateTime<Tz>) -> Option<DateTime<FixedOffset>> {
    let date = parse_template_date(value)?;
    let local = date.and_time(now.time());
    let zone = now.timezone();

    let stamped = match zone.from_local_datetime(&local).earliest() {
        Some(stamped) => stamped,
        // Local time skipped by a DST jump: keep the current offset.
        None => {
            let offset = now.offset().fix();
            let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
            zone.from_utc_datetime(&utc)
        }
    };
    Some(stamped.fixed_offset())
}

/// `Yes` (any case) is a pass; anything else is not.
pub fn is_pass(value: &str) -> bool {
    value.to_uppercase() == "YES"
}

fn required(record: &RawRecord, key: FieldKey) -> Result<&str, BatchError> {
    record
        .get(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| violation(key, Check::Required))
}

/// Convert one validated row.
///
/// Rows that skipped validation fail with the rule they break.
pub fn transform_record<Tz: TimeZone>(
    record: &RawRecord,
    now: &DateTime<Tz>,
) -> Result<TypedLearnerRecord, BatchError> {
    let date_of_birth = required(record, FieldKey::DateOfBirth)?;
    let date_taken = required(record, FieldKey::DateTaken)?;

    Ok(TypedLearnerRecord {
        email_address: required(record, FieldKey::EmailAddress)?.to_string(),
        full_name: required(record, FieldKey::FullName)?.to_string(),
        student_id: required(record, FieldKey::StudentId)?.to_string(),
        date_of_birth: date_of_birth_iso(date_of_birth)
            .ok_or_else(|| violation(FieldKey::DateOfBirth, Check::Matches(Pattern::Date)))?,
        pass: is_pass(required(record, FieldKey::Pass)?),
        date_taken: date_taken_at(date_taken, now)
            .ok_or_else(|| violation(FieldKey::DateTaken, Check::Matches(Pattern::Date)))?,
    })
}

/// Convert every row, keeping file order.
pub fn transform_records<Tz: TimeZone>(
    rows: &[RawRecord],
    now: &DateTime<Tz>,
) -> Result<Vec<TypedLearnerRecord>, BatchError> {
    rows.iter().map(|row| transform_record(row, now)).collect()
}
