use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("profile is empty")]
    Empty,
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
    #[error("expected column '{expected}' at position {position}, found '{found}'")]
    ColumnName {
        position: usize,
        expected: String,
        found: String,
    },
    #[error("column '{column}' has type {found}, expected {expected}")]
    ColumnType {
        column: String,
        expected: String,
        found: String,
    },
    #[error("column '{column}' contains {nulls} null value(s)")]
    NullValues { column: String, nulls: usize },
    #[error("column '{column}' contains negative value(s)")]
    NegativeValues { column: String },
    #[error("duplicate taxonomy identifier {0}")]
    DuplicateTaxonomyId(i64),
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}, column '{column}': cannot parse '{value}' as {target}")]
    Parse {
        line: usize,
        column: String,
        value: String,
        target: &'static str,
    },
    #[error("{quantity} sum to {total}, expected {expected} (tolerance {tolerance})")]
    Composition {
        quantity: String,
        total: f64,
        expected: f64,
        tolerance: f64,
    },
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
