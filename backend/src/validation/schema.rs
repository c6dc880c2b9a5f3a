//! JSON Schema check for exported learner records.
//!
//! Records written by `learnerload validate` (or returned by the upload API)
//! can be re-checked before submission. The schema is embedded at compile time
//! from `schemas/learner-record.json` and uses Draft 7.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use learnerload::is_valid_learner_record;
//!
//! let record = json!({
//!     "emailAddress": "john@x.com",
//!     "fullName": "John Smith",
//!     "studentId": "S100",
//!     "dateOfBirth": "2000-01-15T00:00:00.000Z",
//!     "pass": true,
//!     "dateTaken": "2023-06-01T09:30:00.000Z"
//! });
//! assert!(is_valid_learner_record(&record));
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

static LEARNER_RECORD_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/learner-record.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON value against a Draft 7 schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every error otherwise
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a single exported record.
pub fn validate_learner_record(data: &Value) -> Result<(), Vec<String>> {
    validate(&LEARNER_RECORD_SCHEMA, data)
}

/// Quick check of a single exported record.
pub fn is_valid_learner_record(data: &Value) -> bool {
    jsonschema::draft7::is_valid(&LEARNER_RECORD_SCHEMA, data)
}

/// Validate an array of exported records.
///
/// Returns `(record index, errors)` for each invalid record. A value that is
/// not an array is reported against index 0.
pub fn validate_learner_records(data: &Value) -> Result<(), Vec<(usize, Vec<String>)>> {
    let Some(records) = data.as_array() else {
        return Err(vec![(0, vec!["Expected a JSON array of records".to_string()])]);
    };

    let failures: Vec<(usize, Vec<String>)> = records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| validate_learner_record(record).err().map(|errs| (i, errs)))
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "emailAddress": "john@x.com",
            "fullName": "John Smith",
            "studentId": "S100",
            "dateOfBirth": "2000-01-15T00:00:00.000Z",
            "pass": true,
            "dateTaken": "2023-06-01T09:30:00.000Z"
        })
    }

    #[test]
    fn test_valid_record() {
        assert!(is_valid_learner_record(&record()));
        assert!(validate_learner_record(&record()).is_ok());
    }

    #[test]
    fn test_pass_must_be_boolean() {
        let mut bad = record();
        bad["pass"] = json!("Yes");
        assert!(!is_valid_learner_record(&bad));
    }

    #[test]
    fn test_date_of_birth_must_be_midnight() {
        let mut bad = record();
        bad["dateOfBirth"] = json!("2000-01-15T10:00:00.000Z");
        let errors = validate_learner_record(&bad).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_missing_field() {
        let mut bad = record();
        bad.as_object_mut().unwrap().remove("studentId");
        assert!(!is_valid_learner_record(&bad));
    }

    #[test]
    fn test_records_report_indexes() {
        let mut bad = record();
        bad["fullName"] = json!("John");
        let all = json!([record(), bad, record()]);
        let failures = validate_learner_records(&all).unwrap_err();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, 1);
    }

    #[test]
    fn test_not_an_array() {
        let failures = validate_learner_records(&record()).unwrap_err();
        assert_eq!(failures[0].0, 0);
    }
}
