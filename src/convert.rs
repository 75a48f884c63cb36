//! CSV to JSON conversion.
//!
//! The first row is the header. Every later row becomes one record keyed by
//! the header, with cells kept verbatim as strings (no coercion, no
//! trimming). Rows keep their source order.

use crate::error::{EnrichError, Result};
use crate::record::{write_records, Record};
use csv::ReaderBuilder;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub records: usize,
    pub columns: Vec<String>,
}

/// Parse CSV text from `reader` into records.
///
/// Rows shorter than the header get `null` for the missing columns; cells
/// past the header width are dropped.
pub fn parse_csv_records<R: Read>(reader: R) -> Result<(Vec<String>, Vec<Record>)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut out = Vec::new();
    for result in rdr.records() {
        let row = result?;
        if row.len() > headers.len() {
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            warn!(
                line,
                extra = row.len() - headers.len(),
                "Dropping cells beyond the header width"
            );
        }

        let mut obj = Record::new();
        for (idx, header) in headers.iter().enumerate() {
            let cell = row
                .get(idx)
                .map(|c| Value::String(c.to_string()))
                .unwrap_or(Value::Null);
            obj.insert(header.clone(), cell);
        }
        out.push(obj);
    }

    Ok((headers, out))
}

/// Convert the CSV file at `csv_path` into a JSON array at `json_path`.
///
/// The output is written only after the whole input parsed, so any failure
/// leaves no output file behind.
pub fn convert_csv_to_json(csv_path: &Path, json_path: &Path) -> Result<ConvertSummary> {
    if !csv_path.is_file() {
        return Err(EnrichError::InputNotFound(csv_path.to_path_buf()));
    }

    let bytes = fs::read(csv_path)?;
    let (columns, records) = parse_csv_records(bytes.as_slice())?;
    write_records(json_path, &records)?;

    info!(
        records = records.len(),
        columns = columns.len(),
        "Converted {} -> {}",
        csv_path.display(),
        json_path.display()
    );

    Ok(ConvertSummary {
        records: records.len(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_keeps_values_verbatim() {
        let csv = "name,era,theme,year\n Clay Pot ,Jomon Period,Daily Life,0300\n";
        let (headers, records) = parse_csv_records(csv.as_bytes()).unwrap();

        assert_eq!(headers, vec!["name", "era", "theme", "year"]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], json!(" Clay Pot "));
        assert_eq!(records[0]["year"], json!("0300"));
    }

    #[test]
    fn test_parse_quoted_and_multibyte_cells() {
        let csv = "name,era,theme\n\"埴輪, 馬形\",古墳時代,\"祭祀\"\n";
        let (_, records) = parse_csv_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0]["name"], json!("埴輪, 馬形"));
        assert_eq!(records[0]["era"], json!("古墳時代"));
    }

    #[test]
    fn test_parse_short_and_long_rows() {
        let csv = "name,era,theme\nA,B\nC,D,E,F\n";
        let (_, records) = parse_csv_records(csv.as_bytes()).unwrap();

        assert_eq!(records[0]["theme"], Value::Null);
        assert_eq!(records[1].len(), 3);
        assert_eq!(records[1]["theme"], json!("E"));
    }

    #[test]
    fn test_parse_header_only() {
        let (headers, records) = parse_csv_records("name,era\n".as_bytes()).unwrap();
        assert_eq!(headers.len(), 2);
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let bytes: &[u8] = b"name\n\xff\xfe\n";
        assert!(matches!(
            parse_csv_records(bytes),
            Err(EnrichError::Csv(_))
        ));
    }
}
