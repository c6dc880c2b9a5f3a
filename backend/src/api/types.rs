//! REST API types.
//!
//! The upload response keeps the flat `{ isValid, errorMessage, data }` shape
//! the upload widget reads, plus a job id for log correlation.

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{TypedLearnerRecord, ValidationOutcome};

/// Response sent after a CSV upload has been validated.
///
/// On success `errorMessage` is empty; on failure `data` is empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    /// Unique job identifier
    pub job_id: String,

    pub is_valid: bool,

    pub error_message: String,

    /// Converted learner records, in file order
    pub data: Vec<TypedLearnerRecord>,

    /// Normalized CSV text (empty when rejected)
    pub processed_csv_string: String,
}

impl From<ValidationOutcome> for ValidationResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        let job_id = Uuid::new_v4().to_string();

        match outcome {
            ValidationOutcome::Valid { records, processed_csv } => ValidationResponse {
                job_id,
                is_valid: true,
                error_message: String::new(),
                data: records,
                processed_csv_string: processed_csv,
            },
            ValidationOutcome::Invalid(err) => ValidationResponse {
                job_id,
                is_valid: false,
                error_message: err.to_string(),
                data: Vec::new(),
                processed_csv_string: String::new(),
            },
        }
    }
}

/// Create an error response for requests that never reached the pipeline.
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "isValid": false,
        "errorMessage": error,
        "data": [],
        "processedCsvString": ""
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BatchError;

    #[test]
    fn test_invalid_outcome_shape() {
        let response = ValidationResponse::from(ValidationOutcome::Invalid(BatchError::EmptyBatch));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["isValid"], false);
        assert_eq!(json["errorMessage"], BatchError::EmptyBatch.to_string());
        assert_eq!(json["data"], json!([]));
        assert_eq!(json["processedCsvString"], "");
        assert!(json["jobId"].is_string());
    }

    #[test]
    fn test_valid_outcome_shape() {
        let response = ValidationResponse::from(ValidationOutcome::Valid {
            records: Vec::new(),
            processed_csv: "Email".into(),
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["isValid"], true);
        assert_eq!(json["errorMessage"], "");
        assert_eq!(json["processedCsvString"], "Email");
    }

    #[test]
    fn test_error_response_matches_shape() {
        let json = error_response("No file provided");
        assert_eq!(json["isValid"], false);
        assert_eq!(json["errorMessage"], "No file provided");
        assert_eq!(json["data"], json!([]));
    }
}
