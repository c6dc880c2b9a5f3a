//! The blank upload template.
//!
//! The header-mismatch message points uploaders at this file: row 1 holds
//! the column titles, in order, and nothing else.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::template_headers;

/// Render the template as CSV text (CRLF line ending).
pub fn template_csv() -> CsvResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(template_headers())?;

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write the template to `path`.
pub fn write_template<P: AsRef<Path>>(path: P) -> CsvResult<()> {
    let content = template_csv()?;
    std::fs::write(path, content)?;
    Ok(())
}
