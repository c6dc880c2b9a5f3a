//! Error types for the learner registration pipeline.
//!
//! - [`BatchError`] - Reasons a batch is rejected (shown to the uploader)
//! - [`CsvError`] - Reading and writing CSV files
//! - [`PipelineError`] - Top-level errors of the file/bytes entry points
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

use crate::models::FieldKey;

// =============================================================================
// Batch Rejections
// =============================================================================

/// Message shown when a legal name starts with or contains extra spaces.
pub const NAME_SPACING_MESSAGE: &str = "One or more legal names in the file start with or have space between. Please remove spaces before or between the legal name and upload the file again.";

/// Why a batch was rejected.
///
/// `Display` is the exact text shown to the person uploading the file.
/// Messages carry no row or column position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// Row 1 is not the template header.
    #[error("Column headings in this file don't match the template. Please make your columns match the format of the template file linked above.")]
    HeaderMismatch,

    /// No data rows after the header.
    #[error("The file must contain at least one student record. Please make changes and upload the file again.")]
    EmptyBatch,

    /// A field rule failed on some row.
    #[error("{message}")]
    FieldViolation {
        field: FieldKey,
        message: &'static str,
    },

    /// Two rows share an email.
    #[error("One or more emails in the file aren't unique. Please ensure that each record has a unique email and try again.")]
    DuplicateEmail,

    /// Two rows share a student ID.
    #[error("One or more StudentIDs in the file aren't unique. Please ensure that each record has a unique email and try again.")]
    DuplicateStudentId,
}

// =============================================================================
// CSV Reading Errors
// =============================================================================

/// Errors while reading uploads or writing the template.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to write CSV output.
    #[error("Failed to write CSV: {0}")]
    WriteError(#[from] csv::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Errors of the file and byte entry points.
///
/// Rejected batches are not errors: they come back as
/// [`crate::models::ValidationOutcome::Invalid`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("{0}")]
    BadRequest(String),

    /// Upload refused before decoding.
    #[error("{0}")]
    UnsupportedFile(String),

    /// Could not bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
