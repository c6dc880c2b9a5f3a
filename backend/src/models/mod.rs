//! Domain models for the learner registration pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`FieldKey`] - Internal name of a template column, bound to its label
//! - [`RawRecord`] - One CSV row keyed by [`FieldKey`], before conversion
//! - [`TypedLearnerRecord`] - One converted row, ready for submission
//! - [`ValidationOutcome`] - Result of validating a whole batch

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::BatchError;

// =============================================================================
// Field Keys
// =============================================================================

/// A column of the bulk upload template.
///
/// Variants are declared in template (left-to-right) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    EmailAddress,
    FullName,
    StudentId,
    DateOfBirth,
    Pass,
    DateTaken,
}

impl FieldKey {
    /// All keys in template column order.
    pub const ALL: [FieldKey; 6] = [
        FieldKey::EmailAddress,
        FieldKey::FullName,
        FieldKey::StudentId,
        FieldKey::DateOfBirth,
        FieldKey::Pass,
        FieldKey::DateTaken,
    ];

    /// Column title as it appears in row 1 of the template.
    pub fn label(self) -> &'static str {
        match self {
            FieldKey::EmailAddress => "Email",
            FieldKey::FullName => "Legal name",
            FieldKey::StudentId => "Student ID",
            FieldKey::DateOfBirth => "Date of Birth (MM/DD/YYYY)",
            FieldKey::Pass => "Pass (Yes/No)",
            FieldKey::DateTaken => "Date taken (MM/DD/YYYY)",
        }
    }

    /// Internal (camelCase) name used in output records.
    pub fn name(self) -> &'static str {
        match self {
            FieldKey::EmailAddress => "emailAddress",
            FieldKey::FullName => "fullName",
            FieldKey::StudentId => "studentId",
            FieldKey::DateOfBirth => "dateOfBirth",
            FieldKey::Pass => "pass",
            FieldKey::DateTaken => "dateTaken",
        }
    }

    /// Resolve a (trimmed) column title to its key.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.label() == label)
    }

    /// Position of the column in the template.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Template column titles, in order.
pub fn template_headers() -> [&'static str; 6] {
    FieldKey::ALL.map(FieldKey::label)
}

// =============================================================================
// Raw Record
// =============================================================================

/// A data row bound to field keys, values still as text.
///
/// Always holds one slot per template column. A slot is `None` when the row
/// had fewer cells than the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    values: [Option<String>; 6],
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: FieldKey, value: Option<String>) {
        self.values[key.index()] = value;
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.values[key.index()].as_deref()
    }

    /// Builder-style setter, mostly for tests.
    pub fn with(mut self, key: FieldKey, value: impl Into<String>) -> Self {
        self.set(key, Some(value.into()));
        self
    }

    /// Number of slots, equal to the template width.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

// =============================================================================
// Typed Learner Record
// =============================================================================

/// A validated and converted learner registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedLearnerRecord {
    pub email_address: String,
    pub full_name: String,
    pub student_id: String,
    /// ISO-8601 timestamp at UTC midnight, e.g. `2000-01-15T00:00:00.000Z`.
    pub date_of_birth: String,
    pub pass: bool,
    /// Calendar date in the caller's zone, carrying the transform-time clock.
    #[serde(serialize_with = "serialize_js_timestamp")]
    pub date_taken: DateTime<FixedOffset>,
}

/// Millisecond ISO-8601 in UTC, the shape browsers emit for dates.
pub fn js_timestamp<Tz: chrono::TimeZone>(value: &DateTime<Tz>) -> String {
    value
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_js_timestamp<S: Serializer>(
    value: &DateTime<FixedOffset>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&js_timestamp(value))
}

// =============================================================================
// Validation Outcome
// =============================================================================

/// Result of running one batch through the pipeline.
///
/// A batch is accepted or rejected as a whole.
#[derive(Debug, Clone)]
pub enum ValidationOutcome {
    Invalid(BatchError),
    Valid {
        records: Vec<TypedLearnerRecord>,
        /// Normalized CSV text the records were read from.
        processed_csv: String,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }

    /// User-facing message; empty for accepted batches.
    pub fn error_message(&self) -> String {
        match self {
            ValidationOutcome::Invalid(err) => err.to_string(),
            ValidationOutcome::Valid { .. } => String::new(),
        }
    }

    pub fn records(&self) -> &[TypedLearnerRecord] {
        match self {
            ValidationOutcome::Valid { records, .. } => records,
            ValidationOutcome::Invalid(_) => &[],
        }
    }
}

impl From<BatchError> for ValidationOutcome {
    fn from(err: BatchError) -> Self {
        ValidationOutcome::Invalid(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_labels_round_trip_to_keys() {
        for key in FieldKey::ALL {
            assert_eq!(FieldKey::from_label(key.label()), Some(key));
        }
        assert_eq!(FieldKey::from_label("email"), None);
    }

    #[test]
    fn test_template_order() {
        assert_eq!(
            template_headers(),
            [
                "Email",
                "Legal name",
                "Student ID",
                "Date of Birth (MM/DD/YYYY)",
                "Pass (Yes/No)",
                "Date taken (MM/DD/YYYY)",
            ]
        );
    }

    #[test]
    fn test_raw_record_slots() {
        let record = RawRecord::new().with(FieldKey::StudentId, "S1");
        assert_eq!(record.len(), 6);
        assert_eq!(record.get(FieldKey::StudentId), Some("S1"));
        assert_eq!(record.get(FieldKey::EmailAddress), None);
        assert!(!record.is_empty());
        assert!(RawRecord::new().is_empty());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let taken = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2023, 6, 1, 9, 30, 0)
            .unwrap();
        let record = TypedLearnerRecord {
            email_address: "john@x.com".into(),
            full_name: "John Smith".into(),
            student_id: "S100".into(),
            date_of_birth: "2000-01-15T00:00:00.000Z".into(),
            pass: true,
            date_taken: taken,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["emailAddress"], "john@x.com");
        assert_eq!(json["fullName"], "John Smith");
        assert_eq!(json["studentId"], "S100");
        assert_eq!(json["pass"], true);
        assert_eq!(json["dateTaken"], "2023-06-01T07:30:00.000Z");
    }
}
