//! Encoding-aware CSV reading helpers shared by the loaders
//!
//! The exports come from tooling that writes legacy encodings (the GPS and
//! priority files default to ISO-8859-1), so readers are built from a
//! decoded string rather than the raw file handle.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::{Result, TracksideError, DATE_FORMAT};

/// Open a CSV file, decoding it with the given WHATWG encoding label.
///
/// Unknown labels and byte sequences invalid for the encoding are fatal;
/// a table is either fully decoded or the call fails.
pub fn open_decoded(path: &Path, encoding: &str) -> Result<csv::Reader<Cursor<String>>> {
    let bytes = std::fs::read(path)?;
    let enc = encoding_rs::Encoding::for_label(encoding.as_bytes())
        .ok_or_else(|| TracksideError::UnknownEncoding(encoding.to_string()))?;

    let (text, _, had_errors) = enc.decode(&bytes);
    if had_errors {
        return Err(TracksideError::Decode {
            path: path.display().to_string(),
            encoding: encoding.to_string(),
        });
    }

    Ok(csv::ReaderBuilder::new().from_reader(Cursor::new(text.into_owned())))
}

/// Open a CSV file assumed to be UTF-8 (the capability and recovery exports)
pub fn open_utf8(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    let file = std::fs::File::open(path)?;
    Ok(csv::ReaderBuilder::new().from_reader(file))
}

/// Map header names to column indices.
///
/// Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
/// first header; strip it so lookups by plain column name still work.
pub fn header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().trim_start_matches('\u{feff}').to_string(), idx))
        .collect()
}

/// Fetch a cell by column name.
///
/// A missing column is an error; an empty cell is `None`. Values are
/// trimmed, matching how the analysis treats whitespace-only cells.
pub fn field<'a>(
    record: &'a StringRecord,
    columns: &HashMap<String, usize>,
    name: &str,
) -> Result<Option<&'a str>> {
    let idx = columns
        .get(name)
        .ok_or_else(|| TracksideError::MissingColumn(name.to_string()))?;
    Ok(record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty()))
}

/// Parse a required `DD/MM/YYYY` date cell; empty and malformed are both fatal
pub fn parse_date(column: &str, value: Option<&str>) -> Result<NaiveDate> {
    let text = value.unwrap_or("");
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| TracksideError::DateParse {
        column: column.to_string(),
        value: text.to_string(),
    })
}

/// Lenient numeric coercion: unparseable cells become `None`, never an error
pub fn parse_numeric(value: Option<&str>) -> Option<f64> {
    value.and_then(|s| s.parse::<f64>().ok())
}

/// Columns the loader did not interpret, preserved verbatim per row
pub fn collect_extras(
    headers: &StringRecord,
    record: &StringRecord,
    consumed: &[&str],
) -> std::collections::BTreeMap<String, String> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().trim_start_matches('\u{feff}'), idx))
        .filter(|(name, _)| !consumed.contains(name))
        .map(|(name, idx)| {
            (
                name.to_string(),
                record.get(idx).unwrap_or_default().to_string(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_open_decoded_latin1() {
        let file = fixture(b"name,club\nCucurella,Chelsea\nM\xfcller,Bayern\n");
        let mut reader = open_decoded(file.path(), "ISO-8859-1").unwrap();
        let rows: Vec<StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows[1].get(0), Some("Müller"));
    }

    #[test]
    fn test_open_decoded_unknown_label() {
        let file = fixture(b"a\n1\n");
        let err = open_decoded(file.path(), "EBCDIC-LOL").unwrap_err();
        assert!(matches!(err, TracksideError::UnknownEncoding(_)));
    }

    #[test]
    fn test_open_decoded_invalid_utf8() {
        let file = fixture(b"name\n\xff\xfe\x00junk\n");
        let err = open_decoded(file.path(), "UTF-8").unwrap_err();
        assert!(matches!(err, TracksideError::Decode { .. }));
    }

    #[test]
    fn test_open_missing_file() {
        let err = open_decoded(Path::new("/nonexistent/no.csv"), "UTF-8").unwrap_err();
        assert!(matches!(err, TracksideError::Io(_)));
    }

    #[test]
    fn test_field_missing_column_vs_empty_cell() {
        let headers = StringRecord::from(vec!["date", "value"]);
        let columns = header_map(&headers);
        let record = StringRecord::from(vec!["01/01/2024", ""]);

        assert_eq!(field(&record, &columns, "date").unwrap(), Some("01/01/2024"));
        assert_eq!(field(&record, &columns, "value").unwrap(), None);
        assert!(matches!(
            field(&record, &columns, "missing"),
            Err(TracksideError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_header_map_strips_bom() {
        let headers = StringRecord::from(vec!["\u{feff}date", "value"]);
        let columns = header_map(&headers);
        assert_eq!(columns.get("date"), Some(&0));
    }

    #[test]
    fn test_parse_date_strict() {
        assert_eq!(
            parse_date("date", Some("25/12/2023")).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()
        );
        assert!(parse_date("date", Some("2023-12-25")).is_err());
        assert!(parse_date("date", None).is_err());
    }

    #[test]
    fn test_parse_numeric_lenient() {
        assert_eq!(parse_numeric(Some("61.5")), Some(61.5));
        assert_eq!(parse_numeric(Some("n/a")), None);
        assert_eq!(parse_numeric(None), None);
    }
}
