//! CSV ingestion: decoding, line normalization, header check and row binding.
//!
//! ```text
//! bytes ──decode──▶ text ──normalize──▶ lines ──header──▶ keys ──rows──▶ RawRecord[]
//! ```
//!
//! Columns are separated by `,` or `;` on every line. Rows are separated by
//! `\n`, with an optional trailing `\r` per line. Cells are not quoted.

pub mod header;
pub mod normalize;
pub mod rows;
pub mod template;

use std::path::Path;

use crate::error::CsvResult;

pub use header::{split_columns, validate_header};
pub use normalize::{is_blank, normalize, trim_blank, trim_blank_end, NormalizedText};
pub use rows::{parse_row, parse_rows, trim_value};
pub use template::{template_csv, write_template};

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to text with the given encoding.
///
/// A UTF-8 byte order mark is dropped. Bytes that are not valid UTF-8 are
/// re-read as Windows-1252, the usual encoding of spreadsheet exports.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => {
            let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
            if had_errors {
                encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
            } else {
                text.into_owned()
            }
        }
    }
}

/// Decode an uploaded file's bytes to text, detecting the encoding.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    decode_content(bytes, &encoding)
}

/// Read and decode a CSV file from disk.
pub fn read_csv_file<P: AsRef<Path>>(path: P) -> CsvResult<String> {
    let bytes = std::fs::read(path.as_ref())?;
    Ok(decode_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsvError;

    #[test]
    fn test_utf8_passthrough() {
        let text = decode_bytes("Email,Legal name\r\nzoë@x.com,Zoë Smith".as_bytes());
        assert!(text.contains("Zoë Smith"));
    }

    #[test]
    fn test_utf8_bom_dropped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"Email,Legal name");
        assert_eq!(decode_bytes(&bytes), "Email,Legal name");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_invalid_utf8_falls_back() {
        let bytes: &[u8] = &[0x52, 0xE9, 0x6D, 0x79];
        assert_eq!(decode_content(bytes, "utf-8"), "Rémy");
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_csv_file("/definitely/not/here.csv");
        assert!(matches!(result, Err(CsvError::IoError(_))));
    }
}
