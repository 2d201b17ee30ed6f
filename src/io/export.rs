//! Export filtered records to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::DataPoint;
use crate::error::AppError;

const HEADER: &str = "id,name,category,subcategory,unit,year,period,period_name,value,footnotes";

/// Write one row per record to a CSV file.
pub fn write_records_csv(path: &Path, records: &[DataPoint]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{HEADER}")
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        let footnotes: Vec<&str> = r.footnotes.iter().map(|f| f.text.as_str()).collect();
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{}",
            field(&r.id),
            field(&r.name),
            field(r.category.display_name()),
            field(r.subcategory.as_deref().unwrap_or("")),
            field(&r.unit),
            r.year,
            field(&r.period),
            field(&r.period_name),
            field(&r.raw_value),
            field(&footnotes.join("; ")),
        )
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Quote a field when it contains a delimiter, quote, or line break.
fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Footnote};

    fn record() -> DataPoint {
        DataPoint {
            id: "LASST120000000000003".to_string(),
            name: "Florida Unemployment Rate".to_string(),
            category: Category::StateData,
            subcategory: Some("Florida".to_string()),
            unit: "%".to_string(),
            year: 2024,
            period: "M03".to_string(),
            period_name: "March".to_string(),
            value: Some(3.3),
            raw_value: "3.3".to_string(),
            footnotes: vec![
                Footnote {
                    code: Some("P".to_string()),
                    text: "preliminary".to_string(),
                },
                Footnote {
                    code: None,
                    text: "revised, \"seasonal\"".to_string(),
                },
            ],
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_records_csv(&path, &[record()]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(HEADER));
        assert_eq!(
            lines.next(),
            Some(
                "LASST120000000000003,Florida Unemployment Rate,State Data,Florida,%,2024,M03,March,3.3,\"preliminary; revised, \"\"seasonal\"\"\""
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.csv");
        let err = write_records_csv(&path, &[]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn plain_fields_are_not_quoted() {
        assert_eq!(field("abc"), "abc");
        assert_eq!(field("a,b"), "\"a,b\"");
    }
}
