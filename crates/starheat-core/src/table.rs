//! Flat-table (CSV) primitives and the time-series table shapes.
//!
//! Fields are comma-separated with double-quote escaping. Readers locate
//! columns by header name so column order is not significant. Embedded
//! newlines inside fields are not supported; no value produced by this
//! pipeline contains one.

use std::borrow::Cow;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::TableError;

/// A typed time-series observation as produced by the trends collector.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub entity: String,
    pub date: NaiveDate,
    pub signal: f64,
}

/// A time-series observation as read back from disk, before validation.
///
/// The aggregator owns coercion: rows whose `date` or `signal` do not parse
/// are dropped there, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSeriesRow {
    pub entity: String,
    pub date: String,
    pub signal: String,
}

/// Column names of the time-series table.
pub const SERIES_COLUMNS: [&str; 3] = ["entity", "date", "signal"];

/// Quote a field if it contains a comma, quote, or newline.
#[must_use]
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Join fields into one CSV record (no trailing newline).
#[must_use]
pub fn format_record(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split one CSV record into fields, honoring double-quote escaping.
#[must_use]
pub fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
    }
    fields.push(current);
    fields
}

/// Write a table with a header row and pre-stringified records.
///
/// # Errors
///
/// Returns [`TableError::Io`] if the file cannot be written.
pub fn write_table(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<(), TableError> {
    let mut out = String::new();
    out.push_str(&format_record(header));
    out.push('\n');
    for row in rows {
        let fields: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&format_record(&fields));
        out.push('\n');
    }
    std::fs::write(path, out).map_err(|e| TableError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Read a table into its header and records. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`TableError::Io`] if the file cannot be read and
/// [`TableError::Empty`] if it has no header row.
pub fn read_table(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), TableError> {
    let content = std::fs::read_to_string(path).map_err(|e| TableError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header = match lines.next() {
        Some(line) => split_record(line),
        None => {
            return Err(TableError::Empty {
                path: path.display().to_string(),
            })
        }
    };
    let rows = lines.map(split_record).collect();
    Ok((header, rows))
}

/// Write the time-series table (`entity,date,signal`).
///
/// # Errors
///
/// Returns [`TableError::Io`] if the file cannot be written.
pub fn write_series_table(path: &Path, rows: &[SeriesRow]) -> Result<(), TableError> {
    let records: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.entity.clone(),
                r.date.format("%Y-%m-%d").to_string(),
                format!("{}", r.signal),
            ]
        })
        .collect();
    write_table(path, &SERIES_COLUMNS, &records)
}

/// Read the time-series table back as raw, unvalidated rows.
///
/// Columns are located by header name; extra columns are ignored. Records
/// shorter than the header yield empty strings for the missing cells, which
/// downstream validation then drops.
///
/// # Errors
///
/// Returns [`TableError::MissingColumn`] if a required column is absent, in
/// addition to the [`read_table`] errors.
pub fn read_series_table(path: &Path) -> Result<Vec<RawSeriesRow>, TableError> {
    let (header, records) = read_table(path)?;

    let index_of = |column: &str| -> Result<usize, TableError> {
        header
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| TableError::MissingColumn {
                path: path.display().to_string(),
                column: column.to_string(),
            })
    };

    let entity_idx = index_of("entity")?;
    let date_idx = index_of("date")?;
    let signal_idx = index_of("signal")?;

    let cell = |record: &[String], idx: usize| record.get(idx).cloned().unwrap_or_default();

    Ok(records
        .iter()
        .map(|record| RawSeriesRow {
            entity: cell(record, entity_idx),
            date: cell(record, date_idx),
            signal: cell(record, signal_idx),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("starheat-table-{name}.csv"))
    }

    #[test]
    fn escape_plain_field_is_unchanged() {
        assert_eq!(escape_field("Zendaya"), "Zendaya");
    }

    #[test]
    fn escape_quotes_commas_and_doubles_quotes() {
        assert_eq!(escape_field("Smith, John"), "\"Smith, John\"");
        assert_eq!(
            escape_field("Nicole \"Snooki\" Polizzi"),
            "\"Nicole \"\"Snooki\"\" Polizzi\""
        );
    }

    #[test]
    fn split_record_roundtrips_quoted_fields() {
        let record = format_record(&["Nicole \"Snooki\" Polizzi", "2021-05-01", "42"]);
        let fields = split_record(&record);
        assert_eq!(
            fields,
            vec!["Nicole \"Snooki\" Polizzi", "2021-05-01", "42"]
        );
    }

    #[test]
    fn split_record_handles_embedded_commas() {
        let fields = split_record("\"Smith, John\",2020-01-01,7");
        assert_eq!(fields, vec!["Smith, John", "2020-01-01", "7"]);
    }

    #[test]
    fn series_table_roundtrip() {
        let path = temp_path("roundtrip");
        let rows = vec![
            SeriesRow {
                entity: "Mario".to_string(),
                date: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
                signal: 42.0,
            },
            SeriesRow {
                entity: "Smith, John".to_string(),
                date: NaiveDate::from_ymd_opt(2021, 5, 8).unwrap(),
                signal: 17.5,
            },
        ];
        write_series_table(&path, &rows).unwrap();
        let raw = read_series_table(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].entity, "Mario");
        assert_eq!(raw[0].date, "2021-05-01");
        assert_eq!(raw[0].signal, "42");
        assert_eq!(raw[1].entity, "Smith, John");
        assert_eq!(raw[1].signal, "17.5");
    }

    #[test]
    fn read_series_table_locates_columns_by_name() {
        let path = temp_path("reordered");
        std::fs::write(&path, "signal,entity,date\n9,Zendaya,2021-03-07\n").unwrap();
        let raw = read_series_table(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(raw[0].entity, "Zendaya");
        assert_eq!(raw[0].date, "2021-03-07");
        assert_eq!(raw[0].signal, "9");
    }

    #[test]
    fn read_series_table_rejects_missing_column() {
        let path = temp_path("missing-column");
        std::fs::write(&path, "entity,date\nZendaya,2021-03-07\n").unwrap();
        let result = read_series_table(&path);
        std::fs::remove_file(&path).ok();

        assert!(
            matches!(result, Err(TableError::MissingColumn { ref column, .. }) if column == "signal")
        );
    }

    #[test]
    fn read_table_rejects_empty_file() {
        let path = temp_path("empty");
        std::fs::write(&path, "").unwrap();
        let result = read_table(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(TableError::Empty { .. })));
    }
}
