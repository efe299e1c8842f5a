use crate::error::{AppError, AppResult};
use crate::utils::db_utils::RowSet;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::collections::HashMap;
use tracing::warn;

/// One CSV data row keyed by lower-cased header name. Cell text is kept as
/// written; all-blank cells are absent.
pub type RawRecord = HashMap<String, String>;

/// A data row that could be read, or the reason it could not.
pub type CsvRow = Result<RawRecord, String>;

pub fn read_records(bytes: &[u8]) -> AppResult<Vec<CsvRow>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::Validation(format!("Unreadable CSV header: {e}")))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect::<Vec<_>>();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::Validation("CSV header row is missing".to_string()));
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                let row = headers
                    .iter()
                    .zip(record.iter())
                    .filter(|(h, v)| !h.is_empty() && !v.trim().is_empty())
                    .map(|(h, v)| (h.clone(), v.to_string()))
                    .collect::<RawRecord>();
                rows.push(Ok(row));
            }
            Err(e) => {
                warn!(row = idx + 1, error = %e, "Unreadable CSV row");
                rows.push(Err(e.to_string()));
            }
        }
    }

    Ok(rows)
}

/// Header row followed by one line per record.
pub fn write_rows(rows: &RowSet) -> AppResult<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(&rows.columns)
        .map_err(|e| AppError::Coercion(format!("CSV write failed: {e}")))?;

    for row in &rows.rows {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| AppError::Coercion(format!("CSV write failed: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Coercion(format!("CSV write failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::db_utils::SqlValue;

    #[test]
    fn headers_are_normalized_and_blanks_dropped() {
        let csv = "\u{feff}Emp_Code , Name,Phone\nE1, Ann ,  \n";
        let rows = read_records(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = rows[0].as_ref().unwrap();
        assert_eq!(row.get("emp_code").map(String::as_str), Some("E1"));
        assert_eq!(row.get("name").map(String::as_str), Some(" Ann "));
        assert!(!row.contains_key("phone"));
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let csv = "a,b,c\n1,2\n1,2,3,4\n";
        let rows = read_records(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_ref().unwrap().len(), 2);
        assert_eq!(rows[1].as_ref().unwrap().len(), 3);
    }

    #[test]
    fn invalid_utf8_row_is_reported_not_fatal() {
        let mut bytes = b"name\nok\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"fine\n");
        let rows = read_records(&bytes).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_ok());
        assert!(rows[1].is_err());
        assert!(rows[2].is_ok());
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(read_records(b"").is_err());
    }

    #[test]
    fn writes_header_and_quoted_cells() {
        let rows = RowSet {
            columns: vec!["id".into(), "name".into(), "notes".into()],
            rows: vec![vec![
                SqlValue::I64(1),
                SqlValue::Text("Doe, Jane".into()),
                SqlValue::Null,
            ]],
        };
        let out = String::from_utf8(write_rows(&rows).unwrap()).unwrap();
        assert_eq!(out, "id,name,notes\n1,\"Doe, Jane\",\n");
    }
}
