//! Field rules for learner registration rows.
//!
//! Every row is checked against an ordered list of [`FieldRule`]s. The first
//! failing rule wins: rows are visited in file order and, within a row, rules
//! in list order. The list starts with the right-most template column, so a
//! bad `Date taken` is reported before a bad `Email` on the same row.
//!
//! | Priority | Field         | Checks                                             |
//! |----------|---------------|----------------------------------------------------|
//! | 1        | `dateTaken`   | required, `MM/DD/YYYY`, not after now              |
//! | 2        | `pass`        | required, `Yes`/`No` (any case)                    |
//! | 3        | `dateOfBirth` | required, `MM/DD/YYYY`                             |
//! | 4        | `studentId`   | required                                           |
//! | 5        | `fullName`    | required, no leading space, no double space, 2+ words |
//! | 6        | `emailAddress`| required, no leading space, address shape          |
//!
//! Batch-level checks live in [`uniqueness`]; the JSON Schema for exported
//! records lives in [`schema`].

pub mod schema;
pub mod uniqueness;

use chrono::{DateTime, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{BatchError, NAME_SPACING_MESSAGE};
use crate::models::{FieldKey, RawRecord};
use crate::parser::is_blank;
use crate::transform::dates::parse_template_date;

pub use schema::{is_valid_learner_record, validate_learner_record, validate_learner_records};
pub use uniqueness::ensure_unique;

// =============================================================================
// Patterns
// =============================================================================

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0?[1-9]|1[0-2])[/.-](0?[1-9]|[12][0-9]|3[01])[/.-][0-9]{4}$")
        .expect("date pattern")
});

static PASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(Yes|No)$").expect("pass pattern"));

static FULL_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s]+( [^\s]+)+$").expect("full name pattern"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)+$")
        .expect("email pattern")
});

static DOUBLE_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2}").expect("space pattern"));

/// Shape a value must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// `MM/DD/YYYY` with `/`, `.` or `-`
    Date,
    /// `Yes` or `No`, case-insensitive
    PassValue,
    /// Two or more words separated by single spaces
    FullName,
    /// `local@domain.tld`
    Email,
}

impl Pattern {
    pub fn regex(self) -> &'static Regex {
        match self {
            Pattern::Date => &*DATE_RE,
            Pattern::PassValue => &*PASS_RE,
            Pattern::FullName => &*FULL_NAME_RE,
            Pattern::Email => &*EMAIL_RE,
        }
    }
}

// =============================================================================
// Rules
// =============================================================================

/// A single check on a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Present and non-empty.
    Required,
    Matches(Pattern),
    NoLeadingWhitespace,
    NoDoubleWhitespace,
    /// Local midnight of the date is strictly before now.
    NotInFuture,
}

/// One `(field, check, message)` entry of the rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: FieldKey,
    pub check: Check,
    pub message: &'static str,
}

const fn rule(field: FieldKey, check: Check, message: &'static str) -> FieldRule {
    FieldRule { field, check, message }
}

/// Rules in reporting priority order. Do not reorder.
pub static LEARNER_RULES: [FieldRule; 15] = [
    rule(
        FieldKey::DateTaken,
        Check::Required,
        "The Date taken field is required. Please ensure that each record has a valid date taken and try again.",
    ),
    rule(
        FieldKey::DateTaken,
        Check::Matches(Pattern::Date),
        "The MM/DD/YYYY data format is required for each record for the Date taken field. Please make changes and upload the file again.",
    ),
    rule(
        FieldKey::DateTaken,
        Check::NotInFuture,
        "You cannot provide future time period for the Date taken field. Please ensure that each record has a valid date taken and try again.",
    ),
    rule(
        FieldKey::Pass,
        Check::Required,
        "The Pass field is required. Please ensure that each record has a valid pass and try again.",
    ),
    rule(
        FieldKey::Pass,
        Check::Matches(Pattern::PassValue),
        "Invalid data format. Use values Yes or No for the Pass field. Please make changes and upload the file again.",
    ),
    rule(
        FieldKey::DateOfBirth,
        Check::Required,
        "The Date of birth field is required. Please ensure that each record has a valid date of birth and try again.",
    ),
    rule(
        FieldKey::DateOfBirth,
        Check::Matches(Pattern::Date),
        "The MM/DD/YYYY data format is required for each record for the Date of birth field. Please make changes and upload the file again.",
    ),
    rule(
        FieldKey::StudentId,
        Check::Required,
        "The Student ID field is required. Please ensure that each record has a valid student ID and try again.",
    ),
    rule(
        FieldKey::FullName,
        Check::Required,
        "The Legal name field is required. Please ensure that each record has a valid legal name and try again.",
    ),
    rule(FieldKey::FullName, Check::NoLeadingWhitespace, NAME_SPACING_MESSAGE),
    rule(FieldKey::FullName, Check::NoDoubleWhitespace, NAME_SPACING_MESSAGE),
    rule(
        FieldKey::FullName,
        Check::Matches(Pattern::FullName),
        "One or more legal names in the file don't match the required format. Please make changes and upload the file again.",
    ),
    rule(
        FieldKey::EmailAddress,
        Check::Required,
        "The Email field is required. Please ensure that each record has a valid email and try again.",
    ),
    rule(
        FieldKey::EmailAddress,
        Check::NoLeadingWhitespace,
        "One or more emails in the file start with space. Please remove spaces before the emails and upload the file again.",
    ),
    rule(
        FieldKey::EmailAddress,
        Check::Matches(Pattern::Email),
        "One or more emails in the file don't match the required format. Please make changes and upload the file again.",
    ),
];

impl FieldRule {
    /// Whether `value` passes this rule at time `now`.
    ///
    /// Only [`Check::Required`] accepts a missing value as input; every other
    /// check treats a missing value as a failure.
    pub fn passes<Tz: TimeZone>(&self, value: Option<&str>, now: &DateTime<Tz>) -> bool {
        match (self.check, value) {
            (Check::Required, value) => value.is_some_and(|v| !v.is_empty()),
            (_, None) => false,
            (Check::Matches(pattern), Some(v)) => pattern.regex().is_match(v),
            (Check::NoLeadingWhitespace, Some(v)) => !v.starts_with(is_blank),
            (Check::NoDoubleWhitespace, Some(v)) => !DOUBLE_SPACE_RE.is_match(v),
            (Check::NotInFuture, Some(v)) => parse_template_date(v)
                .map(|date| date.and_time(NaiveTime::MIN) < now.naive_local())
                .unwrap_or(false),
        }
    }

    pub fn violation(&self) -> BatchError {
        BatchError::FieldViolation {
            field: self.field,
            message: self.message,
        }
    }
}

/// The rejection a given `(field, check)` pair reports.
pub fn violation(field: FieldKey, check: Check) -> BatchError {
    let message = LEARNER_RULES
        .iter()
        .find(|rule| rule.field == field && rule.check == check)
        .map_or("", |rule| rule.message);
    BatchError::FieldViolation { field, message }
}

// =============================================================================
// Validation
// =============================================================================

/// Check one row; returns the first failing rule.
pub fn validate_record<Tz: TimeZone>(record: &RawRecord, now: &DateTime<Tz>) -> Result<(), BatchError> {
    match LEARNER_RULES
        .iter()
        .find(|rule| !rule.passes(record.get(rule.field), now))
    {
        Some(rule) => Err(rule.violation()),
        None => Ok(()),
    }
}

/// Check every row in file order, stopping at the first failure.
pub fn validate_rows<Tz: TimeZone>(rows: &[RawRecord], now: &DateTime<Tz>) -> Result<(), BatchError> {
    rows.iter().try_for_each(|row| validate_record(row, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 10, 12, 0, 0)
            .unwrap()
    }

    fn valid_row() -> RawRecord {
        RawRecord::new()
            .with(FieldKey::EmailAddress, "john@x.com")
            .with(FieldKey::FullName, "John Smith")
            .with(FieldKey::StudentId, "S100")
            .with(FieldKey::DateOfBirth, "01/15/2000")
            .with(FieldKey::Pass, "Yes")
            .with(FieldKey::DateTaken, "06/01/2023")
    }

    fn message_for(record: &RawRecord) -> Option<String> {
        validate_record(record, &now()).err().map(|e| e.to_string())
    }

    fn failing_field(record: &RawRecord) -> Option<FieldKey> {
        match validate_record(record, &now()) {
            Err(BatchError::FieldViolation { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_rule_priority_is_reverse_template_order() {
        let mut fields: Vec<FieldKey> = Vec::new();
        for rule in LEARNER_RULES.iter() {
            if fields.last() != Some(&rule.field) {
                fields.push(rule.field);
            }
        }
        let mut expected = FieldKey::ALL.to_vec();
        expected.reverse();
        assert_eq!(fields, expected);
    }

    #[test]
    fn test_every_field_starts_with_required() {
        for key in FieldKey::ALL {
            let first = LEARNER_RULES.iter().find(|r| r.field == key).unwrap();
            assert_eq!(first.check, Check::Required, "{}", key);
        }
    }

    #[test]
    fn test_violation_lookup() {
        let err = violation(FieldKey::DateOfBirth, Check::Matches(Pattern::Date));
        assert!(err.to_string().contains("Date of birth field"));
    }

    #[test]
    fn test_valid_row_passes() {
        assert_eq!(validate_record(&valid_row(), &now()), Ok(()));
    }

    #[test]
    fn test_date_taken_wins_over_email() {
        let row = valid_row()
            .with(FieldKey::EmailAddress, "not-an-email")
            .with(FieldKey::DateTaken, "2023-06-01");
        assert_eq!(failing_field(&row), Some(FieldKey::DateTaken));
    }

    #[test]
    fn test_missing_cell_is_required_failure() {
        let mut row = valid_row();
        row.set(FieldKey::Pass, None);
        assert_eq!(
            message_for(&row).unwrap(),
            "The Pass field is required. Please ensure that each record has a valid pass and try again."
        );

        row.set(FieldKey::Pass, Some(String::new()));
        assert_eq!(failing_field(&row), Some(FieldKey::Pass));
    }

    #[test]
    fn test_future_date_taken_rejected() {
        let row = valid_row().with(FieldKey::DateTaken, "03/11/2024");
        assert!(message_for(&row).unwrap().starts_with("You cannot provide future time period"));

        // Midnight today is already in the past at noon.
        let today = valid_row().with(FieldKey::DateTaken, "03/10/2024");
        assert_eq!(validate_record(&today, &now()), Ok(()));
    }

    #[test]
    fn test_future_date_of_birth_allowed() {
        let row = valid_row().with(FieldKey::DateOfBirth, "12/31/2099");
        assert_eq!(validate_record(&row, &now()), Ok(()));
    }

    #[test]
    fn test_date_formats() {
        for ok in ["1/5/2020", "01.05.2020", "01-05-2020", "12/31/2020"] {
            let row = valid_row().with(FieldKey::DateTaken, ok);
            assert_eq!(validate_record(&row, &now()), Ok(()), "{}", ok);
        }
        for bad in ["2020-01-05", "13/01/2020", "01/32/2020", "01/05/20", "01/05/2020 10:00"] {
            let row = valid_row().with(FieldKey::DateTaken, bad);
            assert!(
                message_for(&row).unwrap().starts_with("The MM/DD/YYYY data format is required"),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_pass_values() {
        for ok in ["Yes", "yes", "NO", "nO"] {
            let row = valid_row().with(FieldKey::Pass, ok);
            assert_eq!(validate_record(&row, &now()), Ok(()), "{}", ok);
        }
        for bad in ["Y", "true", "Yes!"] {
            let row = valid_row().with(FieldKey::Pass, bad);
            assert!(message_for(&row).unwrap().starts_with("Invalid data format"), "{}", bad);
        }
    }

    #[test]
    fn test_full_name_rules() {
        let leading = valid_row().with(FieldKey::FullName, " John Smith");
        assert_eq!(message_for(&leading).unwrap(), NAME_SPACING_MESSAGE);

        let double = valid_row().with(FieldKey::FullName, "John  Smith");
        assert_eq!(message_for(&double).unwrap(), NAME_SPACING_MESSAGE);

        let single = valid_row().with(FieldKey::FullName, "John");
        assert!(message_for(&single).unwrap().contains("don't match the required format"));

        let ok = valid_row().with(FieldKey::FullName, "John Smith");
        assert_eq!(validate_record(&ok, &now()), Ok(()));

        let three = valid_row().with(FieldKey::FullName, "Mary Ann O'Neil");
        assert_eq!(validate_record(&three, &now()), Ok(()));
    }

    #[test]
    fn test_email_rules() {
        let leading = valid_row().with(FieldKey::EmailAddress, " john@x.com");
        assert!(message_for(&leading).unwrap().contains("start with space"));

        for bad in ["john", "john@x", "john@@x.com", "jo hn@x.com", "john@x_y.com"] {
            let row = valid_row().with(FieldKey::EmailAddress, bad);
            assert!(
                message_for(&row).unwrap().contains("emails in the file don't match"),
                "{}",
                bad
            );
        }
        for ok in ["a.b+c@x.co.uk", "o'neil@sub-domain.org"] {
            let row = valid_row().with(FieldKey::EmailAddress, ok);
            assert_eq!(validate_record(&row, &now()), Ok(()), "{}", ok);
        }
    }

    #[test]
    fn test_first_bad_row_wins() {
        let rows = vec![
            valid_row(),
            valid_row().with(FieldKey::EmailAddress, "bad"),
            valid_row().with(FieldKey::DateTaken, "bad"),
        ];
        let err = validate_rows(&rows, &now()).unwrap_err();
        assert!(matches!(
            err,
            BatchError::FieldViolation { field: FieldKey::EmailAddress, .. }
        ));
    }
}
