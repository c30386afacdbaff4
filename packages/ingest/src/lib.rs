#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Upload intake: turns officer input into an [`UploadPayload`].
//!
//! Two independent submission paths share that one downstream
//! contract. Files are forwarded opaquely (spreadsheet parsing and
//! schema validation are server concerns). Pasted tabular text is
//! parsed client-side: the first line is the header defining field
//! names for every subsequent row, and the delimiter is sniffed from
//! the header line — Excel pastes tab-separated text, portal exports
//! use commas. Column types are never validated here.

use std::path::Path;

use district_desk_api_models::{ClipboardRow, UploadPayload};
use thiserror::Error;

/// Errors from upload intake.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Pasted text could not be parsed as a table.
    #[error("Clipboard parse error: {0}")]
    Parse(#[from] csv::Error),

    /// The spreadsheet file could not be read.
    #[error("Failed to read upload file: {0}")]
    Io(#[from] std::io::Error),

    /// The upload path has no file name component.
    #[error("Upload path has no file name: {path}")]
    MissingFileName {
        /// The offending path.
        path: String,
    },
}

/// Parses pasted tabular text into row mappings.
///
/// The header line defines the field names; each subsequent record
/// becomes one field-name -> string-value row. Records with fewer
/// fields than the header simply omit the trailing fields; extra
/// fields beyond the header are dropped. Empty or whitespace-only
/// input yields no rows.
///
/// # Errors
///
/// Returns [`IngestError::Parse`] if a record is malformed beyond
/// what the reader tolerates (e.g. an unterminated quote).
pub fn parse_clipboard(raw: &str) -> Result<Vec<ClipboardRow>, IngestError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let delimiter = sniff_delimiter(trimmed);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(trimmed.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|field| field.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = ClipboardRow::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            row.insert(
                header.clone(),
                serde_json::Value::String(field.to_string()),
            );
        }
        rows.push(row);
    }

    log::debug!("Parsed {} clipboard rows ({} columns)", rows.len(), headers.len());
    Ok(rows)
}

/// Builds the clipboard submission payload for a district.
///
/// # Errors
///
/// Returns [`IngestError::Parse`] if the pasted text cannot be parsed.
pub fn clipboard_payload(district: &str, raw: &str) -> Result<UploadPayload, IngestError> {
    let rows = parse_clipboard(raw)?;
    Ok(UploadPayload::Clipboard {
        district: district.to_string(),
        rows,
    })
}

/// Builds the file submission payload for a district, reading the
/// spreadsheet bytes without inspecting them.
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the file cannot be read, or
/// [`IngestError::MissingFileName`] for a path with no file name.
pub fn file_payload(district: &str, path: &Path) -> Result<UploadPayload, IngestError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| IngestError::MissingFileName {
            path: path.display().to_string(),
        })?
        .to_string();
    let bytes = std::fs::read(path)?;
    Ok(UploadPayload::File {
        district: district.to_string(),
        file_name,
        bytes,
    })
}

/// Picks the field delimiter from the header line: tab when one is
/// present (Excel paste), comma otherwise.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.contains('\t') { b'\t' } else { b',' }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field<'a>(row: &'a ClipboardRow, key: &str) -> &'a str {
        row.get(key).and_then(serde_json::Value::as_str).unwrap()
    }

    #[test]
    fn parses_comma_rows_with_header() {
        let rows = parse_clipboard("case,beat\nA1,E1\nA2,E2").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(field(&rows[0], "case"), "A1");
        assert_eq!(field(&rows[0], "beat"), "E1");
        assert_eq!(field(&rows[1], "case"), "A2");
        assert_eq!(field(&rows[1], "beat"), "E2");
    }

    #[test]
    fn parses_tab_separated_excel_paste() {
        let rows = parse_clipboard("case\tbeat\tcategory\nA1\tE1\tViolent\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(field(&rows[0], "beat"), "E1");
        assert_eq!(field(&rows[0], "category"), "Violent");
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(parse_clipboard("").unwrap().is_empty());
        assert!(parse_clipboard("   \n  ").unwrap().is_empty());
    }

    #[test]
    fn header_only_input_yields_no_rows() {
        assert!(parse_clipboard("case,beat").unwrap().is_empty());
    }

    #[test]
    fn short_records_omit_trailing_fields() {
        let rows = parse_clipboard("case,beat\nA1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(field(&rows[0], "case"), "A1");
        assert!(rows[0].get("beat").is_none());
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters() {
        let rows = parse_clipboard("case,note\nA1,\"theft, vehicle\"").unwrap();
        assert_eq!(field(&rows[0], "note"), "theft, vehicle");
    }

    #[test]
    fn clipboard_payload_carries_district_and_rows() {
        let payload = clipboard_payload("east", "case,beat\nA1,E1\nA2,E2").unwrap();
        match payload {
            UploadPayload::Clipboard { district, rows } => {
                assert_eq!(district, "east");
                assert_eq!(rows.len(), 2);
            }
            UploadPayload::File { .. } => panic!("expected clipboard payload"),
        }
    }

    #[test]
    fn clipboard_payload_serializes_with_input_format() {
        let payload = clipboard_payload("east", "case,beat\nA1,E1").unwrap();
        let UploadPayload::Clipboard { district, rows } = payload else {
            panic!("expected clipboard payload");
        };
        let body = serde_json::json!({
            "district": district,
            "data_payload": rows,
            "input_format": "clipboard",
        });
        assert_eq!(body["input_format"], "clipboard");
        assert_eq!(body["data_payload"].as_array().unwrap().len(), 1);
        assert_eq!(body["data_payload"][0]["case"], "A1");
    }

    #[test]
    fn file_payload_requires_a_file_name() {
        let err = file_payload("east", Path::new("/")).unwrap_err();
        assert!(matches!(err, IngestError::MissingFileName { .. }));
    }
}
