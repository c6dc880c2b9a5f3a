//! Transformation module.
//!
//! This module turns validated rows into typed learner records:
//! - Dates: `MM/DD/YYYY` parsing with calendar rollover
//! - Values: per-field conversion to [`crate::models::TypedLearnerRecord`]
//! - Pipeline: the end-to-end `validate` entry points

pub mod dates;
pub mod pipeline;
pub mod values;

pub use dates::parse_template_date;
pub use pipeline::*;
pub use values::{date_of_birth_iso, date_taken_at, is_pass, transform_record, transform_records};
