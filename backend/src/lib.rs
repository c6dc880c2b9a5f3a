//! # Learnerload - bulk learner registration validation
//!
//! Learnerload takes the CSV file a school uploads to register a batch of
//! learners, checks it against the upload template and converts every row
//! into a typed record ready for submission. A batch is accepted or rejected
//! as a whole, with a single user-facing message.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌──────────┐   ┌────────────┐   ┌────────────┐   ┌──────────┐
//! │ CSV text │──▶│ Normalize │──▶│  Header  │──▶│ Field rules│──▶│ Uniqueness │──▶│  Values  │
//! │          │   │  lines    │   │  + rows  │   │ (per row)  │   │ (batch)    │   │ (typed)  │
//! └──────────┘   └───────────┘   └──────────┘   └────────────┘   └────────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use learnerload::validate;
//!
//! let outcome = validate(&std::fs::read_to_string("learners.csv")?);
//! if outcome.is_valid() {
//!     println!("{} learners ready", outcome.records().len());
//! } else {
//!     eprintln!("{}", outcome.error_message());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Batch rejections and I/O errors
//! - [`models`] - Field keys, raw and typed records, outcomes
//! - [`parser`] - Decoding, line normalization, header and row parsing
//! - [`validation`] - Field rules, uniqueness, exported-record schema
//! - [`transform`] - Value conversion and the end-to-end pipeline
//! - [`config`] - Server settings
//! - [`api`] - HTTP API server and log streaming

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Transformation
pub mod transform;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{BatchError, CsvError, PipelineError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{template_headers, FieldKey, RawRecord, TypedLearnerRecord, ValidationOutcome};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_bytes, detect_encoding, normalize, parse_rows, read_csv_file, split_columns,
    template_csv, validate_header, write_template, NormalizedText,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    ensure_unique, is_valid_learner_record, validate_learner_record, validate_learner_records,
    validate_record, validate_rows, Check, FieldRule, LEARNER_RULES,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{validate, validate_at, validate_bytes, validate_file};
pub use transform::{transform_record, transform_records};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ValidationResponse};
pub use config::ServerConfig;

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
