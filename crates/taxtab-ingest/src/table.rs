//! Shared machinery for reading delimited classifier reports into typed
//! DataFrames: trimmed string rows first, then per-column parsing driven
//! by a [`ColumnSpec`] slice.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use taxtab_model::SchemaError;

/// How one delimited report is tokenised.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub delimiter: u8,
    /// Lines starting with this byte are skipped entirely.
    pub comment: Option<u8>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            comment: None,
        }
    }
}

impl ReadOptions {
    #[must_use]
    pub fn delimiter(mut self, byte: u8) -> Self {
        self.delimiter = byte;
        self
    }

    #[must_use]
    pub fn comment(mut self, byte: u8) -> Self {
        self.comment = Some(byte);
        self
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a delimited file into trimmed string rows, dropping blank lines.
pub fn read_rows(path: &Path, options: ReadOptions) -> Result<Vec<Vec<String>>> {
    let file =
        File::open(path).with_context(|| format!("open report: {}", path.display()))?;
    read_rows_from(file, options).with_context(|| format!("read report: {}", path.display()))
}

/// Same as [`read_rows`] for any byte source; used by in-memory tests.
pub fn read_rows_from<R: Read>(source: R, options: ReadOptions) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .comment(options.comment)
        .from_reader(source);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("read record")?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Compare a header row against the expected column names, positionally
/// and case-insensitively.
pub fn verify_header(row: &[String], expected: &[&str]) -> Result<(), SchemaError> {
    for (position, &name) in expected.iter().enumerate() {
        let found = row.get(position).map(String::as_str).unwrap_or("");
        if !found.eq_ignore_ascii_case(name) {
            return Err(SchemaError::ColumnName {
                position,
                expected: name.to_string(),
                found: found.to_string(),
            });
        }
    }
    if row.len() != expected.len() {
        return Err(SchemaError::ColumnCount {
            expected: expected.len(),
            found: row.len(),
        });
    }
    Ok(())
}

/// Target type of one raw report column.
#[derive(Debug, Clone, Copy)]
pub enum ColumnKind {
    Int,
    Float,
    Str,
    /// Integer column where empty or `NA` cells become nulls.
    NullableInt,
    /// Float column where empty or `NA` cells become nulls.
    NullableFloat,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }
}

fn parse_int(value: &str, column: &'static str, line: usize) -> Result<i64, SchemaError> {
    value.parse().map_err(|_| SchemaError::Parse {
        line,
        column: column.to_string(),
        value: value.to_string(),
        target: "integer",
    })
}

fn parse_float(value: &str, column: &'static str, line: usize) -> Result<f64, SchemaError> {
    value.parse().map_err(|_| SchemaError::Parse {
        line,
        column: column.to_string(),
        value: value.to_string(),
        target: "number",
    })
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || value == "NA"
}

/// Build a typed DataFrame from string rows. Every row must carry exactly
/// one field per spec; rejects empty inputs.
pub fn typed_frame(rows: &[Vec<String>], specs: &[ColumnSpec]) -> Result<DataFrame, SchemaError> {
    if rows.is_empty() {
        return Err(SchemaError::Empty);
    }
    for (index, row) in rows.iter().enumerate() {
        if row.len() != specs.len() {
            return Err(SchemaError::FieldCount {
                line: index + 1,
                expected: specs.len(),
                found: row.len(),
            });
        }
    }
    let mut columns: Vec<Column> = Vec::with_capacity(specs.len());
    for (position, spec) in specs.iter().enumerate() {
        let column: Column = match spec.kind {
            ColumnKind::Int => {
                let mut values = Vec::with_capacity(rows.len());
                for (index, row) in rows.iter().enumerate() {
                    values.push(parse_int(&row[position], spec.name, index + 1)?);
                }
                Series::new(spec.name.into(), values).into()
            }
            ColumnKind::Float => {
                let mut values = Vec::with_capacity(rows.len());
                for (index, row) in rows.iter().enumerate() {
                    values.push(parse_float(&row[position], spec.name, index + 1)?);
                }
                Series::new(spec.name.into(), values).into()
            }
            ColumnKind::Str => {
                let values: Vec<String> = rows.iter().map(|row| row[position].clone()).collect();
                Series::new(spec.name.into(), values).into()
            }
            ColumnKind::NullableInt => {
                let mut values: Vec<Option<i64>> = Vec::with_capacity(rows.len());
                for (index, row) in rows.iter().enumerate() {
                    let cell = row[position].as_str();
                    if is_missing(cell) {
                        values.push(None);
                    } else {
                        values.push(Some(parse_int(cell, spec.name, index + 1)?));
                    }
                }
                Series::new(spec.name.into(), values).into()
            }
            ColumnKind::NullableFloat => {
                let mut values: Vec<Option<f64>> = Vec::with_capacity(rows.len());
                for (index, row) in rows.iter().enumerate() {
                    let cell = row[position].as_str();
                    if is_missing(cell) {
                        values.push(None);
                    } else {
                        values.push(Some(parse_float(cell, spec.name, index + 1)?));
                    }
                }
                Series::new(spec.name.into(), values).into()
            }
        };
        columns.push(column);
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use polars::prelude::DataType;

    use super::*;

    #[test]
    fn reads_rows_with_comments_and_blanks() {
        let data = b"# preamble\na\t1\n\nb\t2\n";
        let rows = read_rows_from(
            &data[..],
            ReadOptions {
                delimiter: b'\t',
                comment: Some(b'#'),
            },
        )
        .unwrap();
        assert_eq!(rows, vec![vec!["a", "1"], vec!["b", "2"]]);
    }

    #[test]
    fn strips_byte_order_mark_and_whitespace() {
        let data = "\u{feff}name\t 42 \n".as_bytes();
        let rows = read_rows_from(data, ReadOptions::default()).unwrap();
        assert_eq!(rows, vec![vec!["name", "42"]]);
    }

    #[test]
    fn builds_typed_columns() {
        let rows = vec![
            vec!["2".to_string(), "0.5".to_string(), "x".to_string(), "7".to_string()],
            vec!["3".to_string(), "1.5".to_string(), "y".to_string(), "NA".to_string()],
        ];
        let specs = [
            ColumnSpec::new("id", ColumnKind::Int),
            ColumnSpec::new("frac", ColumnKind::Float),
            ColumnSpec::new("label", ColumnKind::Str),
            ColumnSpec::new("maybe", ColumnKind::NullableInt),
        ];
        let frame = typed_frame(&rows, &specs).unwrap();
        assert_eq!(frame.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(frame.column("frac").unwrap().dtype(), &DataType::Float64);
        assert_eq!(frame.column("label").unwrap().dtype(), &DataType::String);
        assert_eq!(frame.column("maybe").unwrap().null_count(), 1);
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows = vec![vec!["1".to_string()], vec!["2".to_string(), "3".to_string()]];
        let specs = [ColumnSpec::new("id", ColumnKind::Int)];
        assert!(matches!(
            typed_frame(&rows, &specs),
            Err(SchemaError::FieldCount { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_unparseable_integers() {
        let rows = vec![vec!["abc".to_string()]];
        let specs = [ColumnSpec::new("id", ColumnKind::Int)];
        assert!(matches!(
            typed_frame(&rows, &specs),
            Err(SchemaError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn header_verification_is_positional() {
        let row = vec!["Name".to_string(), "taxonomy_id".to_string()];
        assert!(verify_header(&row, &["name", "taxonomy_id"]).is_ok());
        assert!(matches!(
            verify_header(&row, &["taxonomy_id", "name"]),
            Err(SchemaError::ColumnName { position: 0, .. })
        ));
    }
}
